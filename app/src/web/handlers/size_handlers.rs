// bakehouse/app/src/web/handlers/size_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::catalog::SizeDraft;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Size;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

const SIZE_COLUMNS: &str = "id, name, capacity, price_modifier_cents, created_at";
const DUPLICATE_SIZE: &str = "A size with this name already exists.";

pub async fn list_sizes_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let sizes = sqlx::query_as::<_, Size>(&format!(
    "SELECT {} FROM sizes ORDER BY capacity ASC, name ASC",
    SIZE_COLUMNS
  ))
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(sizes))
}

#[instrument(name = "handler::create_size", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn create_size_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<SizeDraft>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload.validate()?;

  let size = sqlx::query_as::<_, Size>(&format!(
    "INSERT INTO sizes (id, name, capacity, price_modifier_cents) VALUES ($1, $2, $3, $4) RETURNING {}",
    SIZE_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(&draft.name)
  .bind(draft.capacity)
  .bind(draft.price_modifier_cents)
  .fetch_one(&app_state.db_pool)
  .await
  .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_SIZE))?;

  info!(size_id = %size.id, "Size created.");
  Ok(HttpResponse::Created().json(size))
}

#[instrument(name = "handler::update_size", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn update_size_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<SizeDraft>,
) -> Result<HttpResponse, AppError> {
  let size_id = path.into_inner();
  let draft = req_payload.validate()?;

  let size = sqlx::query_as::<_, Size>(&format!(
    "UPDATE sizes SET name = $2, capacity = $3, price_modifier_cents = $4 WHERE id = $1 RETURNING {}",
    SIZE_COLUMNS
  ))
  .bind(size_id)
  .bind(&draft.name)
  .bind(draft.capacity)
  .bind(draft.price_modifier_cents)
  .fetch_optional(&app_state.db_pool)
  .await
  .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_SIZE))?
  .ok_or_else(|| AppError::NotFound(format!("Size {} not found.", size_id)))?;

  Ok(HttpResponse::Ok().json(size))
}

#[instrument(name = "handler::delete_size", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn delete_size_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let size_id = path.into_inner();
  let deleted = sqlx::query("DELETE FROM sizes WHERE id = $1")
    .bind(size_id)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Size {} not found.", size_id)));
  }
  info!(size_id = %size_id, "Size deleted.");
  Ok(HttpResponse::NoContent().finish())
}
