// bakehouse/app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::ContextData;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::expect_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Deserialize, Debug, Default)]
pub struct CheckoutRequestPayload {
  /// Falls back to the default card when absent.
  pub payment_method_id: Option<Uuid>,
  pub delivery_address: Option<String>,
  pub notes: Option<String>,
}

impl CheckoutRequestPayload {
  /// An empty body checks out with the default card; any other body must
  /// parse, so a mistyped field never silently falls back.
  pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
      return Ok(Self::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid checkout request: {}", e)))
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[instrument(name = "handler::checkout", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let payload = CheckoutRequestPayload::from_body(&body)?;
  let ctx_data = ContextData::new(CheckoutCtxData {
    app_state: app_state.get_ref().clone(),
    profile_id: auth_user.id(),
    requested_payment_method_id: payload.payment_method_id,
    delivery_address: non_blank(payload.delivery_address),
    notes: non_blank(payload.notes),
    cart_lines: Vec::new(),
    payment_method: None,
    totals: None,
    created_order: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "checkout")?;

  let order = ctx_data
    .read()
    .created_order
    .clone()
    .ok_or_else(|| AppError::Internal("Checkout completed without an order.".to_string()))?;
  info!(order_id = %order.order.id, total_cents = order.order.total_cents, "Checkout complete.");
  Ok(HttpResponse::Created().json(order))
}
