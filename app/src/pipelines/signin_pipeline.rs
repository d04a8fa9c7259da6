// bakehouse/app/src/pipelines/signin_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use crate::pipelines::contexts::{IssuedSession, SigninCtxData};
use crate::services::auth_service;
use crate::state::AppState;
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Invalid email or password.";

pub fn register_signin_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  let mut p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_credentials", false, None),
    ("verify_password", false, None),
    ("issue_signin_session", false, None),
  ]);

  p.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.email = guard.email.trim().to_lowercase();
      if guard.email.is_empty() || guard.password.is_empty() {
        return Err(AppError::Validation("Email and password are required.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });
  p.on("fetch_credentials", fetch_credentials);
  p.on("verify_password", verify_password);
  p.on("issue_signin_session", issue_signin_session);

  workflows.register_pipeline(p);
  info!("Signin pipeline registered.");
}

async fn fetch_credentials(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (email, db_pool) = {
    let guard = ctx_data.read();
    (guard.email.clone(), guard.app_state.db_pool.clone())
  };

  let profile = sqlx::query_as::<_, Profile>(&format!("SELECT {} FROM profiles WHERE email = $1", PROFILE_COLUMNS))
    .bind(&email)
    .fetch_optional(&db_pool)
    .await?;

  match profile {
    Some(profile) => {
      ctx_data.write().profile = Some(profile);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!("Signin attempt for unknown email.");
      Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
    }
  }
}

async fn verify_password(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (password, hash) = {
    let guard = ctx_data.read();
    let hash = guard
      .profile
      .as_ref()
      .map(|p| p.password_hash.clone())
      .ok_or_else(|| AppError::Internal("Credentials missing before verification.".to_string()))?;
    (guard.password.clone(), hash)
  };

  // Argon2 is CPU-heavy; keep it off the async workers.
  let matches = tokio::task::spawn_blocking(move || auth_service::verify_password(&hash, &password))
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))??;

  if !matches {
    warn!("Signin attempt with wrong password.");
    return Err(AppError::Auth(BAD_CREDENTIALS.to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn issue_signin_session(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (db_pool, ttl_hours, profile_id) = {
    let guard = ctx_data.read();
    let profile_id = guard
      .profile
      .as_ref()
      .map(|p| p.id)
      .ok_or_else(|| AppError::Internal("Profile missing before session issue.".to_string()))?;
    (guard.app_state.db_pool.clone(), guard.app_state.config.session_ttl_hours, profile_id)
  };

  let (token, expires_at) = auth_service::issue_session(&db_pool, profile_id, ttl_hours).await?;
  info!(profile_id = %profile_id, "Signin succeeded.");
  ctx_data.write().session = Some(IssuedSession { token, expires_at });
  Ok(PipelineControl::Continue)
}
