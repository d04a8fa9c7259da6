// bakehouse/app/src/services/auth_service.rs

//! Password hashing and session tokens.

use crate::errors::AppError;
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use argon2::{
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use sqlx::PgPool;
use std::fmt::Write as _;
use tracing::{debug, error, instrument};

pub const SESSION_TOKEN_BYTES: usize = 32;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed_hash = PasswordHash::new(hashed_password).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other) => Err(AppError::Internal(format!("Password verification process failed: {}", other))),
  }
}

/// 64 lowercase hex characters from the OS RNG.
pub fn generate_session_token() -> String {
  let mut bytes = [0u8; SESSION_TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  bytes.iter().fold(String::with_capacity(SESSION_TOKEN_BYTES * 2), |mut acc, b| {
    let _ = write!(acc, "{:02x}", b);
    acc
  })
}

pub fn looks_like_session_token(token: &str) -> bool {
  token.len() == SESSION_TOKEN_BYTES * 2 && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[instrument(name = "auth_service::issue_session", skip(db_pool), fields(profile_id = %profile_id))]
pub async fn issue_session(
  db_pool: &PgPool,
  profile_id: uuid::Uuid,
  ttl_hours: i64,
) -> Result<(String, DateTime<Utc>), AppError> {
  let token = generate_session_token();
  let expires_at = Utc::now() + Duration::hours(ttl_hours);
  sqlx::query("INSERT INTO sessions (token, profile_id, expires_at) VALUES ($1, $2, $3)")
    .bind(&token)
    .bind(profile_id)
    .bind(expires_at)
    .execute(db_pool)
    .await?;
  debug!("Session issued.");
  Ok((token, expires_at))
}

/// Resolves a bearer token to its profile. Expired sessions are deleted.
#[instrument(name = "auth_service::resolve_session", skip_all)]
pub async fn resolve_session(db_pool: &PgPool, token: &str) -> Result<Profile, AppError> {
  if !looks_like_session_token(token) {
    return Err(AppError::Auth("Invalid session token.".to_string()));
  }

  let row: Option<(uuid::Uuid, DateTime<Utc>)> =
    sqlx::query_as("SELECT profile_id, expires_at FROM sessions WHERE token = $1")
      .bind(token)
      .fetch_optional(db_pool)
      .await?;
  let (profile_id, expires_at) = row.ok_or_else(|| AppError::Auth("Invalid session token.".to_string()))?;

  if expires_at <= Utc::now() {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(db_pool)
      .await?;
    return Err(AppError::Auth("Session has expired. Please sign in again.".to_string()));
  }

  sqlx::query_as::<_, Profile>(&format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS))
    .bind(profile_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::Auth("Account no longer exists.".to_string()))
}

#[instrument(name = "auth_service::revoke_session", skip_all)]
pub async fn revoke_session(db_pool: &PgPool, token: &str) -> Result<bool, AppError> {
  let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(db_pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("crusty-sourdough").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "crusty-sourdough").unwrap());
    assert!(!verify_password(&hash, "soggy-sourdough").unwrap());
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn empty_password_cannot_be_hashed() {
    assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
  }

  #[test]
  fn corrupt_hash_is_internal_error() {
    assert!(matches!(verify_password("not-a-hash", "pw"), Err(AppError::Internal(_))));
  }

  #[test]
  fn session_tokens_are_hex_and_unique() {
    let a = generate_session_token();
    let b = generate_session_token();
    assert!(looks_like_session_token(&a));
    assert_ne!(a, b);
    assert!(!looks_like_session_token("abc"));
    assert!(!looks_like_session_token(&"z".repeat(64)));
  }
}
