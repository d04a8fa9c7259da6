// bakehouse-core/src/attendance.rs

//! Staff attendance: one record per staff member per business day with four
//! nullable timestamps, and the arithmetic over them.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceAction {
  CheckIn,
  BreakStart,
  BreakEnd,
  CheckOut,
}

impl AttendanceAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      AttendanceAction::CheckIn => "check-in",
      AttendanceAction::BreakStart => "break-start",
      AttendanceAction::BreakEnd => "break-end",
      AttendanceAction::CheckOut => "check-out",
    }
  }
}

impl fmt::Display for AttendanceAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AttendanceAction {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "check-in" => Ok(AttendanceAction::CheckIn),
      "break-start" => Ok(AttendanceAction::BreakStart),
      "break-end" => Ok(AttendanceAction::BreakEnd),
      "check-out" => Ok(AttendanceAction::CheckOut),
      other => Err(DomainError::validation(format!(
        "Unknown attendance action '{}'. Expected check-in, break-start, break-end or check-out.",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceTimes {
  pub check_in: Option<DateTime<Utc>>,
  pub break_start: Option<DateTime<Utc>>,
  pub break_end: Option<DateTime<Utc>>,
  pub check_out: Option<DateTime<Utc>>,
}

fn not_before(at: DateTime<Utc>, earlier: DateTime<Utc>, what: &str) -> DomainResult<()> {
  if at < earlier {
    return Err(DomainError::transition(format!("Cannot record {} before {}.", what, earlier)));
  }
  Ok(())
}

impl AttendanceTimes {
  /// Records `action` at `at`, enforcing check-in → [break-start → break-end] → check-out.
  pub fn apply(&mut self, action: AttendanceAction, at: DateTime<Utc>) -> DomainResult<()> {
    match action {
      AttendanceAction::CheckIn => {
        if self.check_in.is_some() {
          return Err(DomainError::transition("Already checked in today."));
        }
        self.check_in = Some(at);
      }
      AttendanceAction::BreakStart => {
        let check_in = self
          .check_in
          .ok_or_else(|| DomainError::transition("Check in before starting a break."))?;
        if self.check_out.is_some() {
          return Err(DomainError::transition("Already checked out today."));
        }
        if self.break_start.is_some() {
          return Err(DomainError::transition("Break already started today."));
        }
        not_before(at, check_in, "a break start")?;
        self.break_start = Some(at);
      }
      AttendanceAction::BreakEnd => {
        let break_start = self
          .break_start
          .ok_or_else(|| DomainError::transition("No break in progress."))?;
        if self.break_end.is_some() {
          return Err(DomainError::transition("Break already ended today."));
        }
        not_before(at, break_start, "a break end")?;
        self.break_end = Some(at);
      }
      AttendanceAction::CheckOut => {
        let check_in = self
          .check_in
          .ok_or_else(|| DomainError::transition("Check in before checking out."))?;
        if self.check_out.is_some() {
          return Err(DomainError::transition("Already checked out today."));
        }
        if self.on_break() {
          return Err(DomainError::transition("End the current break before checking out."));
        }
        not_before(at, check_in, "a check-out")?;
        self.check_out = Some(at);
      }
    }
    Ok(())
  }

  pub fn on_break(&self) -> bool {
    self.break_start.is_some() && self.break_end.is_none()
  }

  pub fn break_duration(&self) -> Duration {
    match (self.break_start, self.break_end) {
      (Some(start), Some(end)) if end > start => end - start,
      _ => Duration::zero(),
    }
  }

  /// `None` while the shift is open. Never negative.
  pub fn worked_duration(&self) -> Option<Duration> {
    let (check_in, check_out) = (self.check_in?, self.check_out?);
    let worked = (check_out - check_in) - self.break_duration();
    Some(worked.max(Duration::zero()))
  }

  /// Hours rounded to two decimals; 0.0 while the shift is open.
  pub fn hours_worked(&self) -> f64 {
    match self.worked_duration() {
      Some(d) => (d.num_seconds() as f64 / 36.0).round() / 100.0,
      None => 0.0,
    }
  }

  /// Minutes the check-in came after `scheduled_start`, counted in full once
  /// they exceed `grace_minutes`. Zero within the grace window or when not
  /// checked in.
  pub fn minutes_late(&self, scheduled_start: NaiveDateTime, grace_minutes: i64) -> i64 {
    let Some(check_in) = self.check_in else {
      return 0;
    };
    let late = (check_in.naive_utc() - scheduled_start).num_minutes();
    if late > grace_minutes {
      late
    } else {
      0
    }
  }
}

/// Sum of worked durations over closed shifts, in hours rounded to two decimals.
pub fn total_hours(records: &[AttendanceTimes]) -> f64 {
  let seconds: i64 = records
    .iter()
    .filter_map(|r| r.worked_duration())
    .map(|d| d.num_seconds())
    .sum();
  (seconds as f64 / 36.0).round() / 100.0
}
