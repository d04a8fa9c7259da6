// bakehouse/app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::OrderStatus;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::order::ORDER_COLUMNS;
use crate::models::{Order, OrderItem, OrderWithItems};
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
  pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusPayload {
  pub status: OrderStatus,
}

async fn attach_items(db_pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, AppError> {
  if orders.is_empty() {
    return Ok(Vec::new());
  }
  let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
  let items = sqlx::query_as::<_, OrderItem>(
    "SELECT id, order_id, product_id, size_id, product_name, size_name, quantity, unit_price_cents \
     FROM order_items WHERE order_id = ANY($1) ORDER BY product_name ASC",
  )
  .bind(&order_ids)
  .fetch_all(db_pool)
  .await?;

  let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
  for item in items {
    by_order.entry(item.order_id).or_default().push(item);
  }
  Ok(
    orders
      .into_iter()
      .map(|order| {
        let items = by_order.remove(&order.id).unwrap_or_default();
        OrderWithItems { order, items }
      })
      .collect(),
  )
}

#[instrument(name = "handler::list_my_orders", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn list_my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = sqlx::query_as::<_, Order>(&format!(
    "SELECT {} FROM orders WHERE profile_id = $1 ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .bind(auth_user.id())
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(attach_items(&app_state.db_pool, orders).await?))
}

#[instrument(name = "handler::get_my_order", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn get_my_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  // Someone else's order is reported as missing.
  let order = sqlx::query_as::<_, Order>(&format!(
    "SELECT {} FROM orders WHERE id = $1 AND profile_id = $2",
    ORDER_COLUMNS
  ))
  .bind(order_id)
  .bind(auth_user.id())
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))?;

  let with_items = attach_items(&app_state.db_pool, vec![order])
    .await?
    .into_iter()
    .next()
    .ok_or_else(|| AppError::Internal("Order lookup lost its row.".to_string()))?;
  Ok(HttpResponse::Ok().json(with_items))
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, auth_user), fields(actor_id = %auth_user.id()))]
pub async fn admin_list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = sqlx::query_as::<_, Order>(&format!(
    "SELECT {} FROM orders WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .bind(query.status.map(|s| s.as_str()))
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(attach_items(&app_state.db_pool, orders).await?))
}

#[instrument(name = "handler::update_order_status", skip_all, fields(actor_id = %auth_user.id()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<OrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let mut tx = app_state.db_pool.begin().await?;

  let current: String = sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))?;
  let current: OrderStatus = current.parse()?;
  let next = current.transition_to(req_payload.status)?;

  let order = sqlx::query_as::<_, Order>(&format!(
    "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
    ORDER_COLUMNS
  ))
  .bind(order_id)
  .bind(next.as_str())
  .fetch_one(&mut *tx)
  .await?;
  tx.commit().await?;

  info!(order_id = %order_id, from = %current, to = %next, "Order status changed.");
  Ok(HttpResponse::Ok().json(order))
}
