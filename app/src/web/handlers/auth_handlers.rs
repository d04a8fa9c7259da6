// bakehouse/app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::expect_completed;
use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::AuthenticatedUser;
use bakehouse_core::ContextData;

#[derive(Deserialize)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub full_name: String,
  pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    email: payload.email,
    password: payload.password,
    full_name: payload.full_name,
    phone: payload.phone,
    created_profile: None,
    session: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await.map_err(|e| {
    warn!(error = %e, "Signup failed.");
    e
  })?;
  expect_completed(result, "signup")?;

  let guard = ctx_data.read();
  let profile = guard
    .created_profile
    .clone()
    .ok_or_else(|| AppError::Internal("Signup completed without creating a profile.".to_string()))?;
  let session = guard
    .session
    .clone()
    .ok_or_else(|| AppError::Internal("Signup completed without issuing a session.".to_string()))?;

  info!(profile_id = %profile.id, "Signup successful.");
  Ok(HttpResponse::Created().json(json!({
    "profile": profile,
    "token": session.token,
    "expires_at": session.expires_at,
  })))
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email: payload.email,
    password: payload.password,
    profile: None,
    session: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "signin")?;

  let guard = ctx_data.read();
  let (profile, session) = match (guard.profile.clone(), guard.session.clone()) {
    (Some(profile), Some(session)) => (profile, session),
    _ => return Err(AppError::Auth("Signin completed without a session.".to_string())),
  };

  Ok(HttpResponse::Ok().json(json!({
    "profile": profile,
    "token": session.token,
    "expires_at": session.expires_at,
  })))
}

#[instrument(name = "handler::signout", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::revoke_session(&app_state.db_pool, &auth_user.token).await?;
  info!("Signed out.");
  Ok(HttpResponse::NoContent().finish())
}

pub async fn me_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(auth_user.profile))
}
