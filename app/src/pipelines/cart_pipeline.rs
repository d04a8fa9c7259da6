// bakehouse/app/src/pipelines/cart_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::product::PRODUCT_SELECT;
use crate::models::{CartItem, Product, Size};
use crate::pipelines::contexts::AddToCartCtxData;
use crate::state::AppState;
use bakehouse_core::pricing::{validate_quantity, MAX_LINE_QUANTITY};
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub fn register_add_to_cart_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  // No size requested means the product's base price.
  let no_size: SkipCondition<AddToCartCtxData> =
    Arc::new(|ctx_data: ContextData<AddToCartCtxData>| ctx_data.read().size_id.is_none());

  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("resolve_size", false, Some(no_size)),
    ("upsert_cart_item", false, None),
  ]);

  p.on("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = ctx_data.read().quantity;
      validate_quantity(quantity)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.on("fetch_product_for_cart", fetch_product_for_cart);
  p.on("resolve_size", resolve_size);
  p.on("upsert_cart_item", upsert_cart_item);

  workflows.register_pipeline(p);
  info!("Add-to-cart pipeline registered.");
}

async fn fetch_product_for_cart(ctx_data: ContextData<AddToCartCtxData>) -> AppResult<PipelineControl> {
  let (product_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.product_id, guard.app_state.db_pool.clone())
  };

  let product = sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
    .bind(product_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))?;

  if !product.is_available {
    warn!(product_id = %product_id, "Attempt to add unavailable product to cart.");
    return Err(AppError::Validation(format!("'{}' is currently unavailable.", product.name)));
  }

  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

async fn resolve_size(ctx_data: ContextData<AddToCartCtxData>) -> AppResult<PipelineControl> {
  let (size_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.size_id, guard.app_state.db_pool.clone())
  };
  let Some(size_id) = size_id else {
    return Ok(PipelineControl::Continue);
  };

  let size = sqlx::query_as::<_, Size>(
    "SELECT id, name, capacity, price_modifier_cents, created_at FROM sizes WHERE id = $1",
  )
  .bind(size_id)
  .fetch_optional(&db_pool)
  .await?
  .ok_or_else(|| AppError::Validation(format!("Size {} does not exist.", size_id)))?;

  ctx_data.write().size = Some(size);
  Ok(PipelineControl::Continue)
}

/// Adding a product/size already in the cart increases that line's quantity,
/// capped at the per-line maximum.
async fn upsert_cart_item(ctx_data: ContextData<AddToCartCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, product_id, size_id, quantity, db_pool) = {
    let guard = ctx_data.read();
    (
      guard.profile_id,
      guard.product_id,
      guard.size_id,
      guard.quantity,
      guard.app_state.db_pool.clone(),
    )
  };

  let item = sqlx::query_as::<_, CartItem>(
    "INSERT INTO cart_items (id, profile_id, product_id, size_id, quantity) \
     VALUES ($1, $2, $3, $4, $5) \
     ON CONFLICT ON CONSTRAINT cart_items_line_unique \
     DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $6) \
     RETURNING id, profile_id, product_id, size_id, quantity, added_at",
  )
  .bind(Uuid::new_v4())
  .bind(profile_id)
  .bind(product_id)
  .bind(size_id)
  .bind(quantity)
  .bind(MAX_LINE_QUANTITY)
  .fetch_one(&db_pool)
  .await?;

  debug!(cart_item_id = %item.id, quantity = item.quantity, "Cart line upserted.");
  ctx_data.write().updated_cart_item = Some(item);
  Ok(PipelineControl::Continue)
}
