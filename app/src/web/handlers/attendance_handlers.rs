// bakehouse/app/src/web/handlers/attendance_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::attendance::{total_hours, AttendanceAction, AttendanceTimes};
use bakehouse_core::ContextData;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::{expect_completed, DateRangeQuery};
use crate::errors::AppError;
use crate::models::attendance::ATTENDANCE_COLUMNS;
use crate::models::{AttendanceOverviewRow, AttendanceRecord, AttendanceView};
use crate::pipelines::contexts::AttendanceMarkCtxData;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Default, Deserialize)]
pub struct AdminAttendanceQuery {
  pub staff_id: Option<Uuid>,
  #[serde(flatten)]
  pub range: DateRangeQuery,
}

/// `POST /staff/attendance/{action}` with `check-in`, `break-start`,
/// `break-end` or `check-out`. The time recorded is the server's.
#[instrument(name = "handler::mark_attendance", skip(app_state, auth_user), fields(staff_id = %auth_user.id()))]
pub async fn mark_attendance_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let action: AttendanceAction = path.parse()?;
  let ctx_data = ContextData::new(AttendanceMarkCtxData {
    app_state: app_state.get_ref().clone(),
    staff_id: auth_user.id(),
    action,
    at: Utc::now(),
    work_date: None,
    record: None,
  });

  let result = app_state.workflows.run(ctx_data.clone()).await?;
  expect_completed(result, "attendance")?;

  let record = ctx_data
    .read()
    .record
    .clone()
    .ok_or_else(|| AppError::Internal("Attendance mark completed without a record.".to_string()))?;
  Ok(HttpResponse::Ok().json(AttendanceView::new(record)))
}

#[instrument(name = "handler::my_attendance", skip(app_state, auth_user), fields(staff_id = %auth_user.id()))]
pub async fn my_attendance_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
  query.validate()?;
  let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
    "SELECT {} FROM attendance WHERE staff_id = $1 \
     AND ($2::date IS NULL OR work_date >= $2) AND ($3::date IS NULL OR work_date <= $3) \
     ORDER BY work_date DESC",
    ATTENDANCE_COLUMNS
  ))
  .bind(auth_user.id())
  .bind(query.from)
  .bind(query.to)
  .fetch_all(&app_state.db_pool)
  .await?;

  let times: Vec<AttendanceTimes> = records.iter().map(AttendanceRecord::times).collect();
  let records: Vec<AttendanceView> = records.into_iter().map(AttendanceView::new).collect();
  Ok(HttpResponse::Ok().json(json!({
    "records": records,
    "total_hours": total_hours(&times),
  })))
}

/// Lateness is measured against the earliest schedule entry of the day,
/// converted from the bakery's local time to UTC.
#[instrument(name = "handler::admin_attendance", skip(app_state, auth_user), fields(admin_id = %auth_user.id()))]
pub async fn admin_attendance_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<AdminAttendanceQuery>,
) -> Result<HttpResponse, AppError> {
  query.range.validate()?;
  let rows = sqlx::query_as::<_, AttendanceOverviewRow>(
    "SELECT a.id, a.staff_id, a.work_date, a.check_in, a.break_start, a.break_end, a.check_out, \
     p.full_name AS staff_name, s.start_time AS scheduled_start \
     FROM attendance a \
     JOIN profiles p ON p.id = a.staff_id \
     LEFT JOIN LATERAL ( \
       SELECT MIN(start_time) AS start_time FROM schedules \
       WHERE staff_id = a.staff_id AND work_date = a.work_date \
     ) s ON TRUE \
     WHERE ($1::uuid IS NULL OR a.staff_id = $1) \
     AND ($2::date IS NULL OR a.work_date >= $2) AND ($3::date IS NULL OR a.work_date <= $3) \
     ORDER BY a.work_date DESC, p.full_name ASC",
  )
  .bind(query.staff_id)
  .bind(query.range.from)
  .bind(query.range.to)
  .fetch_all(&app_state.db_pool)
  .await?;

  let offset = Duration::minutes(i64::from(app_state.config.business_utc_offset_minutes));
  let grace = app_state.config.late_grace_minutes;
  let views: Vec<AttendanceView> = rows
    .into_iter()
    .map(|row| {
      let minutes_late = row.scheduled_start.map(|start| {
        let scheduled_utc = row.record.work_date.and_time(start) - offset;
        row.record.times().minutes_late(scheduled_utc, grace)
      });
      let mut view = AttendanceView::new(row.record);
      view.staff_name = Some(row.staff_name);
      view.minutes_late = minutes_late;
      view
    })
    .collect();

  Ok(HttpResponse::Ok().json(views))
}
