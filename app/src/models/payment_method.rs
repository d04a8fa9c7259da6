// bakehouse/app/src/models/payment_method.rs

use bakehouse_core::payment::CardBrand;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

pub const PAYMENT_METHOD_COLUMNS: &str =
  "id, profile_id, brand, last4, exp_month, exp_year, holder_name, is_default, created_at";

/// A saved card. Only the summary is stored; never the number or CVC.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentMethod {
  pub id: Uuid,
  pub profile_id: Uuid,
  #[sqlx(try_from = "String")]
  pub brand: CardBrand,
  pub last4: String,
  pub exp_month: i32,
  pub exp_year: i32,
  pub holder_name: String,
  pub is_default: bool,
  pub created_at: DateTime<Utc>,
}

impl PaymentMethod {
  /// Locks the owning profile row. Every write that can change which card is
  /// the default takes this lock first. `None` when the profile is gone.
  pub async fn lock_owner(conn: &mut PgConnection, profile_id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
      .bind(profile_id)
      .fetch_optional(conn)
      .await
  }
}
