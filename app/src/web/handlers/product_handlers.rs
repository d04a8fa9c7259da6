// bakehouse/app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::catalog::ProductDraft;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::PRODUCT_SELECT;
use crate::models::Product;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
  pub category_id: Option<Uuid>,
  pub search: Option<String>,
  #[serde(default)]
  pub available_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
  pub category_id: Option<Uuid>,
  #[serde(flatten)]
  pub draft: ProductDraft,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let search = query
    .search
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| format!("%{}%", s));

  let products = sqlx::query_as::<_, Product>(&format!(
    "{} WHERE ($1::uuid IS NULL OR p.category_id = $1) \
     AND ($2::text IS NULL OR p.name ILIKE $2 OR p.description ILIKE $2) \
     AND (NOT $3 OR p.is_available) \
     ORDER BY p.name ASC",
    PRODUCT_SELECT
  ))
  .bind(query.category_id)
  .bind(search)
  .bind(query.available_only)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(products))
}

pub(crate) async fn fetch_product(app_state: &AppState, product_id: Uuid) -> Result<Product, AppError> {
  sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))
}

pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = fetch_product(&app_state, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

async fn ensure_category_exists(app_state: &AppState, category_id: Option<Uuid>) -> Result<(), AppError> {
  let Some(category_id) = category_id else {
    return Ok(());
  };
  let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
    .bind(category_id)
    .fetch_one(&app_state.db_pool)
    .await?;
  if !exists {
    return Err(AppError::Validation(format!("Category {} does not exist.", category_id)));
  }
  Ok(())
}

#[instrument(name = "handler::create_product", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let draft = payload.draft.validate()?;
  ensure_category_exists(&app_state, payload.category_id).await?;

  let product_id: Uuid = sqlx::query_scalar(
    "INSERT INTO products (id, category_id, name, description, price_cents, image_url, is_available) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
  )
  .bind(Uuid::new_v4())
  .bind(payload.category_id)
  .bind(&draft.name)
  .bind(&draft.description)
  .bind(draft.price_cents)
  .bind(&draft.image_url)
  .bind(draft.is_available)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(product_id = %product_id, "Product created.");
  let product = fetch_product(&app_state, product_id).await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let payload = req_payload.into_inner();
  let draft = payload.draft.validate()?;
  ensure_category_exists(&app_state, payload.category_id).await?;

  let updated = sqlx::query(
    "UPDATE products SET category_id = $2, name = $3, description = $4, price_cents = $5, \
     image_url = $6, is_available = $7, updated_at = NOW() WHERE id = $1",
  )
  .bind(product_id)
  .bind(payload.category_id)
  .bind(&draft.name)
  .bind(&draft.description)
  .bind(draft.price_cents)
  .bind(&draft.image_url)
  .bind(draft.is_available)
  .execute(&app_state.db_pool)
  .await?
  .rows_affected();
  if updated == 0 {
    return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
  }

  let product = fetch_product(&app_state, product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

/// Cart lines holding the product go with it; order history keeps its copy.
#[instrument(name = "handler::delete_product", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
  }
  info!(product_id = %product_id, "Product deleted.");
  Ok(HttpResponse::NoContent().finish())
}
