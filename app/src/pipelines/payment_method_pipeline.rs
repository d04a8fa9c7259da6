// bakehouse/app/src/pipelines/payment_method_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::payment_method::PAYMENT_METHOD_COLUMNS;
use crate::models::PaymentMethod;
use crate::pipelines::contexts::AddPaymentMethodCtxData;
use crate::state::AppState;
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};
use uuid::Uuid;

const DUPLICATE_CARD: &str = "This card is already saved.";

pub fn register_add_payment_method_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  workflows.register_pipeline(add_payment_method_pipeline());
  info!("Add-payment-method pipeline registered.");
}

fn add_payment_method_pipeline() -> Pipeline<AddPaymentMethodCtxData, AppError> {
  let mut p = Pipeline::<AddPaymentMethodCtxData, AppError>::new(&[
    ("validate_card", false, None),
    ("reject_duplicate_card", false, None),
    ("persist_payment_method", false, None),
  ]);

  p.on("validate_card", |ctx_data: ContextData<AddPaymentMethodCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let today = guard.app_state.business_today();
      let summary = guard.draft.validate(today).map_err(|e| {
        warn!(error = %e, "Card rejected.");
        AppError::from(e)
      })?;
      guard.summary = Some(summary);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.on("reject_duplicate_card", reject_duplicate_card);
  p.on("persist_payment_method", persist_payment_method);
  p
}

async fn reject_duplicate_card(ctx_data: ContextData<AddPaymentMethodCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, summary, db_pool) = {
    let guard = ctx_data.read();
    let summary = guard
      .summary
      .clone()
      .ok_or_else(|| AppError::Internal("Card summary missing before duplicate check.".to_string()))?;
    (guard.profile_id, summary, guard.app_state.db_pool.clone())
  };

  let exists = sqlx::query_scalar::<_, bool>(
    "SELECT EXISTS(SELECT 1 FROM payment_methods \
     WHERE profile_id = $1 AND brand = $2 AND last4 = $3 AND exp_month = $4 AND exp_year = $5)",
  )
  .bind(profile_id)
  .bind(summary.brand.as_str())
  .bind(&summary.last4)
  .bind(summary.exp_month as i32)
  .bind(summary.exp_year)
  .fetch_one(&db_pool)
  .await?;

  if exists {
    return Err(AppError::Conflict(DUPLICATE_CARD.to_string()));
  }
  Ok(PipelineControl::Continue)
}

/// The first card a customer saves is always the default.
async fn persist_payment_method(ctx_data: ContextData<AddPaymentMethodCtxData>) -> AppResult<PipelineControl> {
  let (profile_id, summary, make_default, db_pool) = {
    let guard = ctx_data.read();
    let summary = guard
      .summary
      .clone()
      .ok_or_else(|| AppError::Internal("Card summary missing before persisting.".to_string()))?;
    (guard.profile_id, summary, guard.make_default, guard.app_state.db_pool.clone())
  };

  let mut tx = db_pool.begin().await?;

  PaymentMethod::lock_owner(&mut tx, profile_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

  let has_cards = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM payment_methods WHERE profile_id = $1)")
    .bind(profile_id)
    .fetch_one(&mut *tx)
    .await?;
  let is_default = make_default || !has_cards;
  if is_default && has_cards {
    sqlx::query("UPDATE payment_methods SET is_default = FALSE WHERE profile_id = $1 AND is_default")
      .bind(profile_id)
      .execute(&mut *tx)
      .await?;
  }

  let saved = sqlx::query_as::<_, PaymentMethod>(&format!(
    "INSERT INTO payment_methods (id, profile_id, brand, last4, exp_month, exp_year, holder_name, is_default) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
    PAYMENT_METHOD_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(profile_id)
  .bind(summary.brand.as_str())
  .bind(&summary.last4)
  .bind(summary.exp_month as i32)
  .bind(summary.exp_year)
  .bind(&summary.holder_name)
  .bind(is_default)
  .fetch_one(&mut *tx)
  .await
  .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_CARD))?;

  tx.commit().await?;
  info!(payment_method_id = %saved.id, brand = %saved.brand, is_default, "Payment method saved.");

  ctx_data.write().saved = Some(saved);
  Ok(PipelineControl::Continue)
}
