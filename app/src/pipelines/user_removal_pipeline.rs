// bakehouse/app/src/pipelines/user_removal_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::{RemoveUserCtxData, RemovedRecords};
use crate::state::AppState;
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, instrument, warn};

pub fn register_user_removal_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  let mut p = Pipeline::<RemoveUserCtxData, AppError>::new(&[
    ("refuse_self_removal", false, None),
    ("ensure_target_exists", false, None),
    ("purge_related_records", false, None),
  ]);

  p.on("refuse_self_removal", |ctx_data: ContextData<RemoveUserCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if guard.acting_admin_id == guard.target_profile_id {
        warn!(admin_id = %guard.acting_admin_id, "Admin attempted to remove own account.");
        return Err(AppError::Forbidden("You cannot remove your own account.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });
  p.on("ensure_target_exists", ensure_target_exists);
  p.on("purge_related_records", purge_related_records);

  workflows.register_pipeline(p);
  info!("User-removal pipeline registered.");
}

async fn ensure_target_exists(ctx_data: ContextData<RemoveUserCtxData>) -> AppResult<PipelineControl> {
  let (target_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.target_profile_id, guard.app_state.db_pool.clone())
  };

  let email = sqlx::query_scalar::<_, String>("SELECT email FROM profiles WHERE id = $1")
    .bind(target_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found.", target_id)))?;

  ctx_data.write().target_email = Some(email);
  Ok(PipelineControl::Continue)
}

/// Orders are kept for the books; they lose their link to the profile.
#[instrument(name = "user_removal::purge", skip_all, err(Display))]
async fn purge_related_records(ctx_data: ContextData<RemoveUserCtxData>) -> AppResult<PipelineControl> {
  let (target_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.target_profile_id, guard.app_state.db_pool.clone())
  };

  let mut tx = db_pool.begin().await?;
  let mut removed = RemovedRecords::default();

  removed.sessions = sqlx::query("DELETE FROM sessions WHERE profile_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  removed.cart_items = sqlx::query("DELETE FROM cart_items WHERE profile_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  removed.orders_detached = sqlx::query("UPDATE orders SET profile_id = NULL, updated_at = NOW() WHERE profile_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  removed.payment_methods = sqlx::query("DELETE FROM payment_methods WHERE profile_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  removed.attendance = sqlx::query("DELETE FROM attendance WHERE staff_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  removed.schedules = sqlx::query("DELETE FROM schedules WHERE staff_id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

  let deleted = sqlx::query("DELETE FROM profiles WHERE id = $1")
    .bind(target_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  if deleted == 0 {
    // Removed concurrently between the existence check and here.
    return Err(AppError::NotFound(format!("User {} not found.", target_id)));
  }

  tx.commit().await?;
  info!(profile_id = %target_id, ?removed, "User removed.");

  ctx_data.write().removed = Some(removed);
  Ok(PipelineControl::Continue)
}
