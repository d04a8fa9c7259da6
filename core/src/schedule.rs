// bakehouse-core/src/schedule.rs

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::error::{DomainError, DomainResult};

pub const SCHEDULE_NOTES_MAX: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDraft {
  pub work_date: NaiveDate,
  pub start_time: NaiveTime,
  pub end_time: NaiveTime,
  pub notes: Option<String>,
}

impl ScheduleDraft {
  pub fn validate(&self) -> DomainResult<ScheduleDraft> {
    if self.end_time <= self.start_time {
      return Err(DomainError::validation("End time must be after start time."));
    }
    let notes = self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if notes.is_some_and(|n| n.chars().count() > SCHEDULE_NOTES_MAX) {
      return Err(DomainError::validation(format!(
        "Notes must be at most {} characters.",
        SCHEDULE_NOTES_MAX
      )));
    }
    Ok(ScheduleDraft {
      notes: notes.map(str::to_string),
      ..self.clone()
    })
  }

  pub fn scheduled_minutes(&self) -> i64 {
    (self.end_time - self.start_time).num_minutes().max(0)
  }

  pub fn starts_at(&self) -> NaiveDateTime {
    self.work_date.and_time(self.start_time)
  }
}
