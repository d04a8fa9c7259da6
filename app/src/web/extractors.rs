// bakehouse/app/src/web/extractors.rs

//! Request extractors shared by the handlers.

use crate::errors::AppError;
use crate::models::Profile;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use bakehouse_core::{access, Role};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

/// The signed-in caller. Extraction resolves the bearer token to a profile and
/// then checks the role against the route access table for the request path.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub profile: Profile,
  pub token: String,
}

impl AuthenticatedUser {
  pub fn id(&self) -> uuid::Uuid {
    self.profile.id
  }

  pub fn role(&self) -> Role {
    self.profile.role
  }
}

/// `Authorization: Bearer <token>`; the scheme is matched case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let path = req.path().to_string();
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let token = token.ok_or_else(|| AppError::Auth("Sign in required.".to_string()))?;
      if !auth_service::looks_like_session_token(&token) {
        warn!("Malformed bearer token rejected.");
        return Err(AppError::Auth("Invalid session token.".to_string()));
      }
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      let profile = auth_service::resolve_session(&app_state.db_pool, &token).await?;
      if !access::can_access(profile.role, &path) {
        warn!(profile_id = %profile.id, role = %profile.role, path = %path, "Access denied.");
        return Err(AppError::Forbidden("You do not have access to this resource.".to_string()));
      }

      debug!(profile_id = %profile.id, "Request authenticated.");
      Ok(AuthenticatedUser { profile, token })
    })
  }
}
