// bakehouse/app/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::{ContextData, Role};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::expect_completed;
use crate::errors::AppError;
use crate::models::profile::PROFILE_COLUMNS;
use crate::models::Profile;
use crate::pipelines::contexts::RemoveUserCtxData;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
  pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct RoleChangePayload {
  pub role: Role,
}

#[instrument(name = "handler::list_users", skip(app_state, auth_user), fields(admin_id = %auth_user.id()))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
  let profiles = sqlx::query_as::<_, Profile>(&format!(
    "SELECT {} FROM profiles WHERE ($1::text IS NULL OR role = $1) ORDER BY created_at DESC",
    PROFILE_COLUMNS
  ))
  .bind(query.role.map(|r| r.as_str()))
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(profiles))
}

#[instrument(name = "handler::change_role", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn change_role_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<RoleChangePayload>,
) -> Result<HttpResponse, AppError> {
  let target_id = path.into_inner();
  let new_role = req_payload.role;
  // Keeps at least the acting admin able to administer.
  if target_id == auth_user.id() && new_role != Role::Admin {
    warn!("Admin attempted to demote own account.");
    return Err(AppError::Forbidden("You cannot remove your own admin role.".to_string()));
  }

  let profile = sqlx::query_as::<_, Profile>(&format!(
    "UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
    PROFILE_COLUMNS
  ))
  .bind(target_id)
  .bind(new_role.as_str())
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("User {} not found.", target_id)))?;

  info!(profile_id = %target_id, role = %new_role, "Role changed.");
  Ok(HttpResponse::Ok().json(profile))
}

#[instrument(name = "handler::remove_user", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn remove_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(RemoveUserCtxData {
    app_state: app_state.get_ref().clone(),
    acting_admin_id: auth_user.id(),
    target_profile_id: path.into_inner(),
    target_email: None,
    removed: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "user_removal")?;

  let guard = ctx_data.read();
  Ok(HttpResponse::Ok().json(json!({
    "id": guard.target_profile_id,
    "email": guard.target_email,
    "removed": guard.removed,
  })))
}
