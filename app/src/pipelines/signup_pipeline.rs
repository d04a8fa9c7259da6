// bakehouse/app/src/pipelines/signup_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use crate::pipelines::contexts::{IssuedSession, SignupCtxData};
use crate::services::auth_service;
use crate::state::AppState;
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl, Role};
use tracing::{event, info, warn, Level};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn register_signup_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  let mut p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_profile", false, None),
    ("create_profile", false, None),
    ("issue_signup_session", false, None),
  ]);

  p.on("validate_signup_input", validate_signup_input);
  p.on("check_existing_profile", check_existing_profile);
  p.on("create_profile", create_profile);
  p.on("issue_signup_session", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (db_pool, ttl_hours, profile_id) = {
        let guard = ctx_data.read();
        let profile_id = guard
          .created_profile
          .as_ref()
          .map(|p| p.id)
          .ok_or_else(|| AppError::Internal("Profile missing before session issue.".to_string()))?;
        (guard.app_state.db_pool.clone(), guard.app_state.config.session_ttl_hours, profile_id)
      };

      let (token, expires_at) = auth_service::issue_session(&db_pool, profile_id, ttl_hours).await?;
      ctx_data.write().session = Some(IssuedSession { token, expires_at });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register_pipeline(p);
  info!("Signup pipeline registered.");
}

/// Normalizes in place: trims name and phone, lower-cases the email.
async fn validate_signup_input(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  guard.email = guard.email.trim().to_lowercase();
  guard.full_name = guard.full_name.trim().to_string();
  guard.phone = guard.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(str::to_string);

  event!(Level::DEBUG, email = %guard.email, "Validating signup input.");
  let email = &guard.email;
  let at = email.find('@');
  if email.is_empty() || at.is_none() || at == Some(0) || at == Some(email.len() - 1) {
    warn!("Invalid email format provided for signup.");
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if guard.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  if guard.full_name.is_empty() {
    return Err(AppError::Validation("Full name is required.".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn check_existing_profile(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let (email, db_pool) = {
    let guard = ctx_data.read();
    (guard.email.clone(), guard.app_state.db_pool.clone())
  };

  let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM profiles WHERE email = $1)")
    .bind(&email)
    .fetch_one(&db_pool)
    .await?;
  if exists {
    warn!("Attempt to sign up with existing email: {}", email);
    return Err(AppError::Conflict("An account with this email already exists.".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn create_profile(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let (email, password, full_name, phone, db_pool, bootstrap_admin) = {
    let guard = ctx_data.read();
    (
      guard.email.clone(),
      guard.password.clone(),
      guard.full_name.clone(),
      guard.phone.clone(),
      guard.app_state.db_pool.clone(),
      guard.app_state.config.bootstrap_admin_email.clone(),
    )
  };

  let role = if bootstrap_admin.as_deref() == Some(email.as_str()) {
    info!("Bootstrap admin email signed up; granting admin role.");
    Role::Admin
  } else {
    Role::Customer
  };
  let password_hash = tokio::task::spawn_blocking(move || auth_service::hash_password(&password))
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

  let profile = sqlx::query_as::<_, Profile>(&format!(
    "INSERT INTO profiles (id, email, password_hash, full_name, phone, role) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
    PROFILE_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(&email)
  .bind(password_hash)
  .bind(&full_name)
  .bind(&phone)
  .bind(role.as_str())
  .fetch_one(&db_pool)
  .await
  // Two concurrent signups can both pass the existence check.
  .map_err(|e| AppError::from_unique_violation(e, "An account with this email already exists."))?;

  info!(profile_id = %profile.id, role = %profile.role, "Profile created.");
  ctx_data.write().created_profile = Some(profile);
  Ok(PipelineControl::Continue)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::database_state;

  #[tokio::test]
  async fn signup_stores_a_verifiable_hash() {
    let Some(app_state) = database_state().await else {
      return;
    };
    let email = format!("{}@signup.bakehouse", Uuid::new_v4());
    let ctx_data = ContextData::new(SignupCtxData {
      app_state: app_state.clone(),
      email: email.to_uppercase(),
      password: "rye-and-sourdough".to_string(),
      full_name: "Dana Baker".to_string(),
      phone: None,
      created_profile: None,
      session: None,
    });
    app_state.workflows.run(ctx_data.clone()).await.unwrap();

    let profile = ctx_data.read().created_profile.clone().unwrap();
    assert_eq!(profile.email, email);
    assert!(auth_service::verify_password(&profile.password_hash, "rye-and-sourdough").unwrap());
    assert!(!auth_service::verify_password(&profile.password_hash, "wrong-password").unwrap());
    assert!(ctx_data.read().session.is_some());
  }
}
