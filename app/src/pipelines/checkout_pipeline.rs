// bakehouse/app/src/pipelines/checkout_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::cart_item::CART_LINES_SELECT;
use crate::models::order::ORDER_COLUMNS;
use crate::models::payment_method::PAYMENT_METHOD_COLUMNS;
use crate::models::{CartLineRow, Order, OrderItem, OrderWithItems, PaymentMethod};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use bakehouse_core::pricing::{format_cents, price_cart, CartLine};
use bakehouse_core::{ContextData, FlowRegistry, OrderStatus, Pipeline, PipelineControl};
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub fn register_checkout_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  workflows.register_pipeline(checkout_pipeline());
  info!("Checkout pipeline registered.");
}

fn checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("load_cart", false, None),
    ("resolve_payment_method", false, None),
    ("price_order", false, None),
    ("persist_order", false, None),
  ]);

  p.on("load_cart", load_cart);
  p.on("resolve_payment_method", resolve_payment_method);
  p.on("price_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let lines: Vec<CartLine> = guard.cart_lines.iter().map(CartLineRow::as_pricing_line).collect();
      let totals = price_cart(&lines, &guard.app_state.config.pricing)?;
      info!(
        items = totals.item_count,
        total = %format_cents(totals.total_cents, &guard.app_state.config.currency),
        "Order priced."
      );
      guard.totals = Some(totals);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.on("persist_order", persist_order);
  p
}

async fn load_cart(ctx_data: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.profile_id, guard.app_state.db_pool.clone())
  };

  let lines = sqlx::query_as::<_, CartLineRow>(CART_LINES_SELECT)
    .bind(profile_id)
    .fetch_all(&db_pool)
    .await?;

  if lines.is_empty() {
    return Err(AppError::Validation("Your cart is empty.".to_string()));
  }
  let unavailable: Vec<&str> = lines
    .iter()
    .filter(|l| !l.is_available)
    .map(|l| l.product_name.as_str())
    .collect();
  if !unavailable.is_empty() {
    warn!(profile_id = %profile_id, "Checkout blocked by unavailable products.");
    return Err(AppError::Validation(format!(
      "Some items are no longer available: {}.",
      unavailable.join(", ")
    )));
  }

  ctx_data.write().cart_lines = lines;
  Ok(PipelineControl::Continue)
}

/// Uses the requested card, or the default one when none was named.
async fn resolve_payment_method(ctx_data: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, requested, db_pool) = {
    let guard = ctx_data.read();
    (guard.profile_id, guard.requested_payment_method_id, guard.app_state.db_pool.clone())
  };

  let method = match requested {
    Some(id) => sqlx::query_as::<_, PaymentMethod>(&format!(
      "SELECT {} FROM payment_methods WHERE id = $1 AND profile_id = $2",
      PAYMENT_METHOD_COLUMNS
    ))
    .bind(id)
    .bind(profile_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::Payment("Selected payment method was not found.".to_string()))?,
    None => sqlx::query_as::<_, PaymentMethod>(&format!(
      "SELECT {} FROM payment_methods WHERE profile_id = $1 AND is_default",
      PAYMENT_METHOD_COLUMNS
    ))
    .bind(profile_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::Payment("Add a payment method before checking out.".to_string()))?,
  };

  ctx_data.write().payment_method = Some(method);
  Ok(PipelineControl::Continue)
}

fn to_db_cents(value: i64, what: &str) -> AppResult<i32> {
  i32::try_from(value).map_err(|_| AppError::Validation(format!("Order {} is too large.", what)))
}

#[instrument(name = "checkout::persist_order", skip_all, err(Display))]
async fn persist_order(ctx_data: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, lines, totals, payment_method_id, delivery_address, notes, currency, db_pool) = {
    let guard = ctx_data.read();
    let totals = guard
      .totals
      .ok_or_else(|| AppError::Internal("Order totals missing before persisting.".to_string()))?;
    let payment_method_id = guard
      .payment_method
      .as_ref()
      .map(|m| m.id)
      .ok_or_else(|| AppError::Internal("Payment method missing before persisting.".to_string()))?;
    (
      guard.profile_id,
      guard.cart_lines.clone(),
      totals,
      payment_method_id,
      guard.delivery_address.clone(),
      guard.notes.clone(),
      guard.app_state.config.currency.clone(),
      guard.app_state.db_pool.clone(),
    )
  };

  let line_ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
  let mut tx = db_pool.begin().await?;

  // Only the loaded lines are ordered and removed; anything added meanwhile
  // stays in the cart.
  let locked: Vec<(Uuid, i32)> =
    sqlx::query_as("SELECT id, quantity FROM cart_items WHERE profile_id = $1 AND id = ANY($2) FOR UPDATE")
      .bind(profile_id)
      .bind(&line_ids)
      .fetch_all(&mut *tx)
      .await?;
  let unchanged = locked.len() == lines.len()
    && lines
      .iter()
      .all(|line| locked.iter().any(|(id, quantity)| *id == line.id && *quantity == line.quantity));
  if !unchanged {
    warn!(profile_id = %profile_id, "Cart changed while checking out.");
    return Err(AppError::Conflict(
      "Your cart changed during checkout. Review it and try again.".to_string(),
    ));
  }

  let order = sqlx::query_as::<_, Order>(&format!(
    "INSERT INTO orders (id, profile_id, status, subtotal_cents, tax_cents, delivery_fee_cents, total_cents, \
     currency, payment_method_id, delivery_address, notes) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
    ORDER_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(profile_id)
  .bind(OrderStatus::Pending.as_str())
  .bind(to_db_cents(totals.subtotal_cents, "subtotal")?)
  .bind(to_db_cents(totals.tax_cents, "tax")?)
  .bind(to_db_cents(totals.delivery_fee_cents, "delivery fee")?)
  .bind(to_db_cents(totals.total_cents, "total")?)
  .bind(&currency)
  .bind(payment_method_id)
  .bind(&delivery_address)
  .bind(&notes)
  .fetch_one(&mut *tx)
  .await?;

  let mut items = Vec::with_capacity(lines.len());
  for line in &lines {
    let item = sqlx::query_as::<_, OrderItem>(
      "INSERT INTO order_items (id, order_id, product_id, size_id, product_name, size_name, quantity, unit_price_cents) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
       RETURNING id, order_id, product_id, size_id, product_name, size_name, quantity, unit_price_cents",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.size_id)
    .bind(&line.product_name)
    .bind(&line.size_name)
    .bind(line.quantity)
    .bind(to_db_cents(line.unit_price_cents(), "item price")?)
    .fetch_one(&mut *tx)
    .await?;
    items.push(item);
  }

  sqlx::query("DELETE FROM cart_items WHERE id = ANY($1)")
    .bind(&line_ids)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  info!(order_id = %order.id, item_lines = items.len(), "Order placed.");

  ctx_data.write().created_order = Some(OrderWithItems { order, items });
  Ok(PipelineControl::Continue)
}
