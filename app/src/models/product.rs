// bakehouse/app/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Select list for `Product`; expects `products p LEFT JOIN categories c`.
pub const PRODUCT_SELECT: &str = "SELECT p.id, p.category_id, c.name AS category_name, p.name, p.description, \
   p.price_cents, p.image_url, p.is_available, p.created_at, p.updated_at \
   FROM products p LEFT JOIN categories c ON c.id = p.category_id";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub category_id: Option<Uuid>,
  pub category_name: Option<String>,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i32,
  pub image_url: Option<String>,
  pub is_available: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
