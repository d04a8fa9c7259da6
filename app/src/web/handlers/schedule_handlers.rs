// bakehouse/app/src/web/handlers/schedule_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::schedule::ScheduleDraft;
use bakehouse_core::Role;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::DateRangeQuery;
use crate::errors::AppError;
use crate::models::schedule::SCHEDULE_COLUMNS;
use crate::models::Schedule;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
  pub staff_id: Uuid,
  #[serde(flatten)]
  pub draft: ScheduleDraft,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminScheduleQuery {
  pub staff_id: Option<Uuid>,
  #[serde(flatten)]
  pub range: DateRangeQuery,
}

const SCHEDULE_FILTER: &str = "($1::uuid IS NULL OR staff_id = $1) \
   AND ($2::date IS NULL OR work_date >= $2) AND ($3::date IS NULL OR work_date <= $3) \
   ORDER BY work_date ASC, start_time ASC";

async fn query_schedules(
  app_state: &AppState,
  staff_id: Option<Uuid>,
  range: &DateRangeQuery,
) -> Result<Vec<Schedule>, AppError> {
  range.validate()?;
  let schedules = sqlx::query_as::<_, Schedule>(&format!(
    "SELECT {} FROM schedules WHERE {}",
    SCHEDULE_COLUMNS, SCHEDULE_FILTER
  ))
  .bind(staff_id)
  .bind(range.from)
  .bind(range.to)
  .fetch_all(&app_state.db_pool)
  .await?;
  Ok(schedules)
}

/// Schedules can only be assigned to staff and admins.
async fn ensure_schedulable(app_state: &AppState, staff_id: Uuid) -> Result<(), AppError> {
  let role: Option<Role> = sqlx::query_scalar::<_, String>("SELECT role FROM profiles WHERE id = $1")
    .bind(staff_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .map(Role::try_from)
    .transpose()?;
  match role {
    Some(role) if role.is_staff() => Ok(()),
    Some(_) => Err(AppError::Validation("Schedules can only be assigned to staff members.".to_string())),
    None => Err(AppError::Validation(format!("Staff member {} does not exist.", staff_id))),
  }
}

pub async fn my_schedules_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
  let schedules = query_schedules(&app_state, Some(auth_user.id()), &query).await?;
  Ok(HttpResponse::Ok().json(schedules))
}

pub async fn admin_list_schedules_handler(
  app_state: web::Data<AppState>,
  _auth_user: AuthenticatedUser,
  query: web::Query<AdminScheduleQuery>,
) -> Result<HttpResponse, AppError> {
  let schedules = query_schedules(&app_state, query.staff_id, &query.range).await?;
  Ok(HttpResponse::Ok().json(schedules))
}

#[instrument(name = "handler::create_schedule", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn create_schedule_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<SchedulePayload>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload.draft.validate()?;
  ensure_schedulable(&app_state, req_payload.staff_id).await?;

  let schedule = sqlx::query_as::<_, Schedule>(&format!(
    "INSERT INTO schedules (id, staff_id, work_date, start_time, end_time, notes) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
    SCHEDULE_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(req_payload.staff_id)
  .bind(draft.work_date)
  .bind(draft.start_time)
  .bind(draft.end_time)
  .bind(&draft.notes)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(schedule_id = %schedule.id, staff_id = %schedule.staff_id, minutes = draft.scheduled_minutes(), "Schedule created.");
  Ok(HttpResponse::Created().json(schedule))
}

#[instrument(name = "handler::update_schedule", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn update_schedule_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<SchedulePayload>,
) -> Result<HttpResponse, AppError> {
  let schedule_id = path.into_inner();
  let draft = req_payload.draft.validate()?;
  ensure_schedulable(&app_state, req_payload.staff_id).await?;

  let schedule = sqlx::query_as::<_, Schedule>(&format!(
    "UPDATE schedules SET staff_id = $2, work_date = $3, start_time = $4, end_time = $5, notes = $6 \
     WHERE id = $1 RETURNING {}",
    SCHEDULE_COLUMNS
  ))
  .bind(schedule_id)
  .bind(req_payload.staff_id)
  .bind(draft.work_date)
  .bind(draft.start_time)
  .bind(draft.end_time)
  .bind(&draft.notes)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Schedule {} not found.", schedule_id)))?;

  Ok(HttpResponse::Ok().json(schedule))
}

#[instrument(name = "handler::delete_schedule", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn delete_schedule_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let schedule_id = path.into_inner();
  let deleted = sqlx::query("DELETE FROM schedules WHERE id = $1")
    .bind(schedule_id)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Schedule {} not found.", schedule_id)));
  }
  Ok(HttpResponse::NoContent().finish())
}
