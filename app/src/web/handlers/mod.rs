// bakehouse/app/src/web/handlers/mod.rs

pub mod attendance_handlers;
pub mod auth_handlers;
pub mod cart_handlers;
pub mod category_handlers;
pub mod checkout_handlers;
pub mod expense_handlers;
pub mod order_handlers;
pub mod payment_method_handlers;
pub mod product_handlers;
pub mod report_handlers;
pub mod schedule_handlers;
pub mod size_handlers;
pub mod user_handlers;

use crate::errors::AppError;
use bakehouse_core::PipelineResult;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

/// `?from=&to=` on list endpoints; both ends inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
  pub fn validate(&self) -> Result<(), AppError> {
    if let (Some(from), Some(to)) = (self.from, self.to) {
      if to < from {
        return Err(AppError::Validation("'to' must not be before 'from'.".to_string()));
      }
    }
    Ok(())
  }
}

/// None of the pipelines stop early on purpose; a stop is reported as a halt.
pub(crate) fn expect_completed(result: PipelineResult, pipeline: &str) -> Result<(), AppError> {
  match result {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      warn!(pipeline, "Pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}
