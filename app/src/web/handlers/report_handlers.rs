// bakehouse/app/src/web/handlers/report_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::expense::ExpenseCategory;
use bakehouse_core::report::{aggregate, ExpenseRow, RangePreset, ReportPeriod, RevenueRow};
use bakehouse_core::OrderStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

/// Either a preset `range` (week, month, year; default week) or an explicit
/// `from`/`to` pair. `buckets` defaults to the preset's natural split.
#[derive(Debug, Default, Deserialize)]
pub struct FinancialReportQuery {
  pub range: Option<RangePreset>,
  pub from: Option<NaiveDate>,
  pub to: Option<NaiveDate>,
  pub buckets: Option<u32>,
}

impl FinancialReportQuery {
  fn resolve(&self, today: NaiveDate, utc_offset_minutes: i32) -> Result<(ReportPeriod, u32), AppError> {
    match (self.from, self.to) {
      (Some(from), Some(to)) => {
        let period = ReportPeriod::with_utc_offset(from, to, utc_offset_minutes)?;
        let buckets = self.buckets.unwrap_or_else(|| period.days().clamp(1, 7) as u32);
        Ok((period, buckets))
      }
      (None, None) => {
        let preset = self.range.unwrap_or(RangePreset::Week);
        let buckets = self.buckets.unwrap_or_else(|| preset.default_buckets());
        Ok((ReportPeriod::from_preset(preset, today, utc_offset_minutes)?, buckets))
      }
      _ => Err(AppError::Validation("Provide both 'from' and 'to', or neither.".to_string())),
    }
  }
}

#[instrument(name = "handler::financial_report", skip(app_state, auth_user), fields(admin_id = %auth_user.id()))]
pub async fn financial_report_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<FinancialReportQuery>,
) -> Result<HttpResponse, AppError> {
  let (period, bucket_count) = query.resolve(
    app_state.business_today(),
    app_state.config.business_utc_offset_minutes,
  )?;

  let orders: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
    "SELECT created_at, total_cents::BIGINT FROM orders \
     WHERE status <> $1 AND created_at >= $2 AND created_at < $3",
  )
  .bind(OrderStatus::Cancelled.as_str())
  .bind(period.starts_at())
  .bind(period.ends_at())
  .fetch_all(&app_state.db_pool)
  .await?;

  let expenses: Vec<(NaiveDate, String, i64)> = sqlx::query_as(
    "SELECT incurred_on, category, amount_cents::BIGINT FROM expenses \
     WHERE incurred_on >= $1 AND incurred_on <= $2",
  )
  .bind(period.start)
  .bind(period.end)
  .fetch_all(&app_state.db_pool)
  .await?;

  let revenue: Vec<RevenueRow> = orders
    .into_iter()
    .map(|(created_at, total_cents)| RevenueRow { created_at, total_cents })
    .collect();
  let expenses = expenses
    .into_iter()
    .map(|(incurred_on, category, amount_cents)| {
      Ok(ExpenseRow {
        incurred_on,
        category: ExpenseCategory::try_from(category)?,
        amount_cents,
      })
    })
    .collect::<Result<Vec<_>, AppError>>()?;

  debug!(orders = revenue.len(), expenses = expenses.len(), "Aggregating financial report.");
  let report = aggregate(&period, bucket_count, &revenue, &expenses)?;
  Ok(HttpResponse::Ok().json(report))
}
