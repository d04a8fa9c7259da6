// bakehouse/app/src/models/profile.rs

use bakehouse_core::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const PROFILE_COLUMNS: &str = "id, email, password_hash, full_name, phone, role, created_at, updated_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub full_name: String,
  pub phone: Option<String>,
  #[sqlx(try_from = "String")]
  pub role: Role,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
