// bakehouse/app/src/web/handlers/payment_method_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::payment::CardDraft;
use bakehouse_core::ContextData;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::expect_completed;
use crate::errors::AppError;
use crate::models::payment_method::PAYMENT_METHOD_COLUMNS;
use crate::models::PaymentMethod;
use crate::pipelines::contexts::AddPaymentMethodCtxData;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Deserialize)]
pub struct AddPaymentMethodPayload {
  #[serde(flatten)]
  pub card: CardDraft,
  #[serde(default)]
  pub make_default: bool,
}

#[instrument(name = "handler::list_payment_methods", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn list_payment_methods_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let methods = sqlx::query_as::<_, PaymentMethod>(&format!(
    "SELECT {} FROM payment_methods WHERE profile_id = $1 ORDER BY is_default DESC, created_at DESC",
    PAYMENT_METHOD_COLUMNS
  ))
  .bind(auth_user.id())
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(HttpResponse::Ok().json(methods))
}

/// The card payload is never logged; only the saved summary is.
#[instrument(name = "handler::add_payment_method", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn add_payment_method_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<AddPaymentMethodPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(AddPaymentMethodCtxData {
    app_state: app_state.get_ref().clone(),
    profile_id: auth_user.id(),
    draft: payload.card,
    make_default: payload.make_default,
    summary: None,
    saved: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "add_payment_method")?;

  let saved = ctx_data
    .read()
    .saved
    .clone()
    .ok_or_else(|| AppError::Internal("Card pipeline completed without saving.".to_string()))?;
  Ok(HttpResponse::Created().json(saved))
}

#[instrument(name = "handler::set_default_payment_method", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn set_default_payment_method_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let method_id = path.into_inner();
  let mut tx = app_state.db_pool.begin().await?;
  PaymentMethod::lock_owner(&mut tx, auth_user.id())
    .await?
    .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

  let owned = sqlx::query_scalar::<_, bool>(
    "SELECT EXISTS(SELECT 1 FROM payment_methods WHERE id = $1 AND profile_id = $2)",
  )
  .bind(method_id)
  .bind(auth_user.id())
  .fetch_one(&mut *tx)
  .await?;
  if !owned {
    return Err(AppError::NotFound("Payment method not found.".to_string()));
  }

  // The one-default index is checked per row, so clear before setting.
  sqlx::query("UPDATE payment_methods SET is_default = FALSE WHERE profile_id = $1 AND is_default AND id <> $2")
    .bind(auth_user.id())
    .bind(method_id)
    .execute(&mut *tx)
    .await?;
  sqlx::query("UPDATE payment_methods SET is_default = TRUE WHERE id = $1")
    .bind(method_id)
    .execute(&mut *tx)
    .await?;

  let method = sqlx::query_as::<_, PaymentMethod>(&format!(
    "SELECT {} FROM payment_methods WHERE id = $1",
    PAYMENT_METHOD_COLUMNS
  ))
  .bind(method_id)
  .fetch_one(&mut *tx)
  .await?;
  tx.commit().await?;

  info!(payment_method_id = %method_id, "Default payment method changed.");
  Ok(HttpResponse::Ok().json(method))
}

/// Removing the default card promotes the newest remaining one.
#[instrument(name = "handler::delete_payment_method", skip_all, fields(profile_id = %auth_user.id()))]
pub async fn delete_payment_method_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let method_id = path.into_inner();
  let mut tx = app_state.db_pool.begin().await?;
  PaymentMethod::lock_owner(&mut tx, auth_user.id())
    .await?
    .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

  let was_default: bool =
    sqlx::query_scalar("DELETE FROM payment_methods WHERE id = $1 AND profile_id = $2 RETURNING is_default")
      .bind(method_id)
      .bind(auth_user.id())
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(|| AppError::NotFound("Payment method not found.".to_string()))?;

  if was_default {
    sqlx::query(
      "UPDATE payment_methods SET is_default = TRUE WHERE id = \
       (SELECT id FROM payment_methods WHERE profile_id = $1 ORDER BY created_at DESC LIMIT 1)",
    )
    .bind(auth_user.id())
    .execute(&mut *tx)
    .await?;
  }
  tx.commit().await?;

  info!(payment_method_id = %method_id, was_default, "Payment method removed.");
  Ok(HttpResponse::NoContent().finish())
}
