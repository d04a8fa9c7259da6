// bakehouse/app/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::catalog::CategoryDraft;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Category;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at";
const DUPLICATE_CATEGORY: &str = "A category with this name already exists.";

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = sqlx::query_as::<_, Category>(&format!(
    "SELECT {} FROM categories ORDER BY name ASC",
    CATEGORY_COLUMNS
  ))
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::create_category", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<CategoryDraft>,
) -> Result<HttpResponse, AppError> {
  let (name, slug, description) = req_payload.validate()?;

  let category = sqlx::query_as::<_, Category>(&format!(
    "INSERT INTO categories (id, name, slug, description) VALUES ($1, $2, $3, $4) RETURNING {}",
    CATEGORY_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(&name)
  .bind(&slug)
  .bind(&description)
  .fetch_one(&app_state.db_pool)
  .await
  .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_CATEGORY))?;

  info!(category_id = %category.id, slug = %category.slug, "Category created.");
  Ok(HttpResponse::Created().json(category))
}

#[instrument(name = "handler::update_category", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<CategoryDraft>,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();
  let (name, slug, description) = req_payload.validate()?;

  let category = sqlx::query_as::<_, Category>(&format!(
    "UPDATE categories SET name = $2, slug = $3, description = $4 WHERE id = $1 RETURNING {}",
    CATEGORY_COLUMNS
  ))
  .bind(category_id)
  .bind(&name)
  .bind(&slug)
  .bind(&description)
  .fetch_optional(&app_state.db_pool)
  .await
  .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_CATEGORY))?
  .ok_or_else(|| AppError::NotFound(format!("Category {} not found.", category_id)))?;

  Ok(HttpResponse::Ok().json(category))
}

/// Products in the category stay in the catalog without a category.
#[instrument(name = "handler::delete_category", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();
  let mut tx = app_state.db_pool.begin().await?;

  let detached = sqlx::query("UPDATE products SET category_id = NULL, updated_at = NOW() WHERE category_id = $1")
    .bind(category_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
    .bind(category_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Category {} not found.", category_id)));
  }
  tx.commit().await?;

  info!(category_id = %category_id, detached, "Category deleted.");
  Ok(HttpResponse::NoContent().finish())
}
