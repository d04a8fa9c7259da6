// bakehouse/app/src/models/order.rs

use bakehouse_core::OrderStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::OrderItem;

pub const ORDER_COLUMNS: &str = "id, profile_id, status, subtotal_cents, tax_cents, delivery_fee_cents, total_cents, \
   currency, payment_method_id, delivery_address, notes, created_at, updated_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  /// `None` once the customer's profile has been removed.
  pub profile_id: Option<Uuid>,
  #[sqlx(try_from = "String")]
  pub status: OrderStatus,
  pub subtotal_cents: i32,
  pub tax_cents: i32,
  pub delivery_fee_cents: i32,
  pub total_cents: i32,
  pub currency: String,
  pub payment_method_id: Option<Uuid>,
  pub delivery_address: Option<String>,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}
