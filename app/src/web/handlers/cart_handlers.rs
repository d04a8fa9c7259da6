// bakehouse/app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::pricing::{price_cart, validate_quantity, CartLine};
use bakehouse_core::ContextData;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::expect_completed;
use crate::errors::AppError;
use crate::models::cart_item::CART_LINES_SELECT;
use crate::models::{CartLineRow, CartLineView};
use crate::pipelines::contexts::AddToCartCtxData;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub size_id: Option<Uuid>,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemPayload {
  pub quantity: i32,
}

#[instrument(name = "handler::get_cart", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let rows = sqlx::query_as::<_, CartLineRow>(CART_LINES_SELECT)
    .bind(auth_user.id())
    .fetch_all(&app_state.db_pool)
    .await?;

  let lines: Vec<CartLine> = rows.iter().map(CartLineRow::as_pricing_line).collect();
  let totals = price_cart(&lines, &app_state.config.pricing)?;
  let items: Vec<CartLineView> = rows.iter().map(CartLineView::from).collect();

  Ok(HttpResponse::Ok().json(json!({
    "items": items,
    "totals": totals,
    "currency": app_state.config.currency,
  })))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, auth_user),
  fields(profile_id = %auth_user.id(), product_id = %req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToCartCtxData {
    app_state: app_state.get_ref().clone(),
    profile_id: auth_user.id(),
    product_id: req_payload.product_id,
    size_id: req_payload.size_id,
    quantity: req_payload.quantity,
    product: None,
    size: None,
    updated_cart_item: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "add_to_cart")?;

  let item = ctx_data
    .read()
    .updated_cart_item
    .clone()
    .ok_or_else(|| AppError::Internal("Add to cart completed without a cart line.".to_string()))?;
  info!(cart_item_id = %item.id, quantity = item.quantity, "Item added to cart.");
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::update_cart_item", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let quantity = validate_quantity(req_payload.quantity)?;

  let updated = sqlx::query("UPDATE cart_items SET quantity = $3 WHERE id = $1 AND profile_id = $2")
    .bind(item_id)
    .bind(auth_user.id())
    .bind(quantity)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if updated == 0 {
    return Err(AppError::NotFound("Cart item not found.".to_string()));
  }
  Ok(HttpResponse::Ok().json(json!({ "id": item_id, "quantity": quantity })))
}

#[instrument(name = "handler::remove_cart_item", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND profile_id = $2")
    .bind(path.into_inner())
    .bind(auth_user.id())
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound("Cart item not found.".to_string()));
  }
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::clear_cart", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let removed = sqlx::query("DELETE FROM cart_items WHERE profile_id = $1")
    .bind(auth_user.id())
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  info!(removed, "Cart cleared.");
  Ok(HttpResponse::NoContent().finish())
}
