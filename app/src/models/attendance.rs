// bakehouse/app/src/models/attendance.rs

use bakehouse_core::attendance::AttendanceTimes;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const ATTENDANCE_COLUMNS: &str = "id, staff_id, work_date, check_in, break_start, break_end, check_out";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
  pub id: Uuid,
  pub staff_id: Uuid,
  pub work_date: NaiveDate,
  pub check_in: Option<DateTime<Utc>>,
  pub break_start: Option<DateTime<Utc>>,
  pub break_end: Option<DateTime<Utc>>,
  pub check_out: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
  pub fn times(&self) -> AttendanceTimes {
    AttendanceTimes {
      check_in: self.check_in,
      break_start: self.break_start,
      break_end: self.break_end,
      check_out: self.check_out,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceView {
  #[serde(flatten)]
  pub record: AttendanceRecord,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub staff_name: Option<String>,
  pub break_minutes: i64,
  pub hours_worked: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minutes_late: Option<i64>,
}

impl AttendanceView {
  pub fn new(record: AttendanceRecord) -> Self {
    let times = record.times();
    AttendanceView {
      record,
      staff_name: None,
      break_minutes: times.break_duration().num_minutes(),
      hours_worked: times.hours_worked(),
      minutes_late: None,
    }
  }
}

/// Admin listing row: the record plus the staff member's name and the
/// earliest scheduled start for that day, if any.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceOverviewRow {
  #[sqlx(flatten)]
  pub record: AttendanceRecord,
  pub staff_name: String,
  pub scheduled_start: Option<NaiveTime>,
}
