// bakehouse/app/src/models/schedule.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const SCHEDULE_COLUMNS: &str = "id, staff_id, work_date, start_time, end_time, notes, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Schedule {
  pub id: Uuid,
  pub staff_id: Uuid,
  pub work_date: NaiveDate,
  pub start_time: NaiveTime,
  pub end_time: NaiveTime,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}
