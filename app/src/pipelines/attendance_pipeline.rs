// bakehouse/app/src/pipelines/attendance_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::attendance::ATTENDANCE_COLUMNS;
use crate::models::AttendanceRecord;
use crate::pipelines::contexts::AttendanceMarkCtxData;
use crate::state::AppState;
use bakehouse_core::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, instrument};
use uuid::Uuid;

pub fn register_attendance_pipeline(workflows: &FlowRegistry<AppError>, _app_state: &AppState) {
  let mut p = Pipeline::<AttendanceMarkCtxData, AppError>::new(&[
    ("resolve_work_date", false, None),
    ("apply_attendance_action", false, None),
  ]);

  p.on("resolve_work_date", |ctx_data: ContextData<AttendanceMarkCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      if guard.work_date.is_none() {
        guard.work_date = Some(guard.app_state.business_today());
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.on("apply_attendance_action", apply_attendance_action);

  workflows.register_pipeline(p);
  info!("Attendance pipeline registered.");
}

/// One row per staff member and day. The row is locked while the action is
/// applied so two quick taps cannot both record a check-in.
#[instrument(name = "attendance::apply_action", skip_all, err(Display))]
async fn apply_attendance_action(ctx_data: ContextData<AttendanceMarkCtxData>) -> AppResult<PipelineControl> {
  let (staff_id, action, at, work_date, db_pool) = {
    let guard = ctx_data.read();
    let work_date = guard
      .work_date
      .ok_or_else(|| AppError::Internal("Work date missing before marking attendance.".to_string()))?;
    (guard.staff_id, guard.action, guard.at, work_date, guard.app_state.db_pool.clone())
  };

  let mut tx = db_pool.begin().await?;

  sqlx::query(
    "INSERT INTO attendance (id, staff_id, work_date) VALUES ($1, $2, $3) \
     ON CONFLICT ON CONSTRAINT attendance_staff_day_unique DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .bind(staff_id)
  .bind(work_date)
  .execute(&mut *tx)
  .await?;

  let current = sqlx::query_as::<_, AttendanceRecord>(&format!(
    "SELECT {} FROM attendance WHERE staff_id = $1 AND work_date = $2 FOR UPDATE",
    ATTENDANCE_COLUMNS
  ))
  .bind(staff_id)
  .bind(work_date)
  .fetch_one(&mut *tx)
  .await?;

  let mut times = current.times();
  // Rolls back the placeholder row as well when the action is out of order.
  times.apply(action, at)?;

  let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
    "UPDATE attendance SET check_in = $2, break_start = $3, break_end = $4, check_out = $5 \
     WHERE id = $1 RETURNING {}",
    ATTENDANCE_COLUMNS
  ))
  .bind(current.id)
  .bind(times.check_in)
  .bind(times.break_start)
  .bind(times.break_end)
  .bind(times.check_out)
  .fetch_one(&mut *tx)
  .await?;

  tx.commit().await?;
  info!(staff_id = %staff_id, action = %action, work_date = %work_date, "Attendance marked.");

  ctx_data.write().record = Some(record);
  Ok(PipelineControl::Continue)
}
