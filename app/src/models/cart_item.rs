// bakehouse/app/src/models/cart_item.rs

use bakehouse_core::pricing::{unit_price_cents, CartLine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub profile_id: Uuid,
  pub product_id: Uuid,
  pub size_id: Option<Uuid>,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// Select list for `CartLineRow`; bind the profile id as `$1`.
pub const CART_LINES_SELECT: &str = "SELECT ci.id, ci.product_id, p.name AS product_name, p.image_url, \
   p.price_cents, p.is_available, ci.size_id, s.name AS size_name, s.price_modifier_cents, ci.quantity, ci.added_at \
   FROM cart_items ci \
   JOIN products p ON p.id = ci.product_id \
   LEFT JOIN sizes s ON s.id = ci.size_id \
   WHERE ci.profile_id = $1 \
   ORDER BY ci.added_at ASC";

/// A cart line joined with its product and size.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub image_url: Option<String>,
  pub price_cents: i32,
  pub is_available: bool,
  pub size_id: Option<Uuid>,
  pub size_name: Option<String>,
  pub price_modifier_cents: Option<i32>,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

impl CartLineRow {
  pub fn unit_price_cents(&self) -> i64 {
    unit_price_cents(self.price_cents, self.price_modifier_cents)
  }

  pub fn as_pricing_line(&self) -> CartLine {
    CartLine {
      unit_price_cents: self.unit_price_cents(),
      quantity: self.quantity,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub image_url: Option<String>,
  pub size_id: Option<Uuid>,
  pub size_name: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub line_total_cents: i64,
  pub is_available: bool,
}

impl From<&CartLineRow> for CartLineView {
  fn from(row: &CartLineRow) -> Self {
    let unit = row.unit_price_cents();
    CartLineView {
      id: row.id,
      product_id: row.product_id,
      product_name: row.product_name.clone(),
      image_url: row.image_url.clone(),
      size_id: row.size_id,
      size_name: row.size_name.clone(),
      quantity: row.quantity,
      unit_price_cents: unit,
      line_total_cents: unit * i64::from(row.quantity),
      is_available: row.is_available,
    }
  }
}
