// bakehouse/app/src/models/size.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Size {
  pub id: Uuid,
  pub name: String,
  /// Servings.
  pub capacity: i32,
  pub price_modifier_cents: i32,
  pub created_at: DateTime<Utc>,
}
