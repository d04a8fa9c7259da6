// bakehouse/app/src/pipelines/contexts.rs

//! Context data for each pipeline. Handlers receive these wrapped in
//! `ContextData`; inputs are set by the HTTP handler, `Option` outputs are
//! filled in by the steps.

use crate::models::{AttendanceRecord, CartItem, CartLineRow, OrderWithItems, PaymentMethod, Product, Profile, Size};
use crate::state::AppState;
use bakehouse_core::attendance::AttendanceAction;
use bakehouse_core::payment::{CardDraft, CardSummary};
use bakehouse_core::pricing::CartTotals;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub full_name: String,
  pub phone: Option<String>,
  pub created_profile: Option<Profile>,
  pub session: Option<IssuedSession>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub profile: Option<Profile>,
  pub session: Option<IssuedSession>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub profile_id: Uuid,
  pub product_id: Uuid,
  pub size_id: Option<Uuid>,
  pub quantity: i32,
  pub product: Option<Product>,
  pub size: Option<Size>,
  pub updated_cart_item: Option<CartItem>,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub profile_id: Uuid,
  pub requested_payment_method_id: Option<Uuid>,
  pub delivery_address: Option<String>,
  pub notes: Option<String>,
  pub cart_lines: Vec<CartLineRow>,
  pub payment_method: Option<PaymentMethod>,
  pub totals: Option<CartTotals>,
  pub created_order: Option<OrderWithItems>,
}

#[derive(Clone)]
pub struct AddPaymentMethodCtxData {
  pub app_state: AppState,
  pub profile_id: Uuid,
  pub draft: CardDraft,
  pub make_default: bool,
  pub summary: Option<CardSummary>,
  pub saved: Option<PaymentMethod>,
}

#[derive(Clone)]
pub struct AttendanceMarkCtxData {
  pub app_state: AppState,
  pub staff_id: Uuid,
  pub action: AttendanceAction,
  pub at: DateTime<Utc>,
  pub work_date: Option<NaiveDate>,
  pub record: Option<AttendanceRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovedRecords {
  pub sessions: u64,
  pub cart_items: u64,
  pub payment_methods: u64,
  pub attendance: u64,
  pub schedules: u64,
  pub orders_detached: u64,
}

#[derive(Clone)]
pub struct RemoveUserCtxData {
  pub app_state: AppState,
  pub acting_admin_id: Uuid,
  pub target_profile_id: Uuid,
  pub target_email: Option<String>,
  pub removed: Option<RemovedRecords>,
}
