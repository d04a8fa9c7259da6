// bakehouse/app/src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Name and price are copied at checkout so later catalog edits do not
/// rewrite order history.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Option<Uuid>,
  pub size_id: Option<Uuid>,
  pub product_name: String,
  pub size_name: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i32,
}
