// bakehouse-core/src/report.rs

//! Financial reports: split a date period into equal buckets and sum order
//! revenue and expenses into them.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DomainError, DomainResult};
use crate::expense::ExpenseCategory;

pub const MAX_BUCKETS: u32 = 366;
pub const DEFAULT_BUCKETS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
  Week,
  Month,
  Year,
}

impl RangePreset {
  pub fn default_buckets(&self) -> u32 {
    match self {
      RangePreset::Week => 7,
      RangePreset::Month => 4,
      RangePreset::Year => 12,
    }
  }

  fn days(&self) -> u64 {
    match self {
      RangePreset::Week => 7,
      RangePreset::Month => 30,
      RangePreset::Year => 365,
    }
  }
}

pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Inclusive on both ends. Days run from local midnight to local midnight,
/// `utc_offset_minutes` east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
  pub start: NaiveDate,
  pub end: NaiveDate,
  pub utc_offset_minutes: i32,
  #[serde(skip)]
  starts_at: DateTime<Utc>,
  #[serde(skip)]
  ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketSpan {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

impl BucketSpan {
  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.start <= at && at < self.end
  }
}

fn local_midnight(date: NaiveDate, utc_offset_minutes: i32) -> Option<DateTime<Utc>> {
  date
    .and_time(NaiveTime::MIN)
    .checked_sub_signed(Duration::minutes(i64::from(utc_offset_minutes)))
    .map(|naive| Utc.from_utc_datetime(&naive))
}

impl ReportPeriod {
  /// A period of UTC days.
  pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
    Self::with_utc_offset(start, end, 0)
  }

  pub fn with_utc_offset(start: NaiveDate, end: NaiveDate, utc_offset_minutes: i32) -> DomainResult<Self> {
    if end < start {
      return Err(DomainError::validation("Report end date must not be before the start date."));
    }
    if utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
      return Err(DomainError::validation(format!(
        "UTC offset must be within +/- {} minutes.",
        MAX_UTC_OFFSET_MINUTES
      )));
    }
    let out_of_range = || DomainError::validation("Report dates are out of the supported range.");
    let starts_at = local_midnight(start, utc_offset_minutes).ok_or_else(out_of_range)?;
    let ends_at = end
      .succ_opt()
      .and_then(|next| local_midnight(next, utc_offset_minutes))
      .ok_or_else(out_of_range)?;
    Ok(Self {
      start,
      end,
      utc_offset_minutes,
      starts_at,
      ends_at,
    })
  }

  /// The preset's span of days ending on (and including) `today`.
  pub fn from_preset(preset: RangePreset, today: NaiveDate, utc_offset_minutes: i32) -> DomainResult<Self> {
    let start = today.checked_sub_days(Days::new(preset.days() - 1)).unwrap_or(today);
    Self::with_utc_offset(start, today, utc_offset_minutes)
  }

  pub fn days(&self) -> i64 {
    (self.end - self.start).num_days() + 1
  }

  /// Local midnight starting `start`.
  pub fn starts_at(&self) -> DateTime<Utc> {
    self.starts_at
  }

  /// Exclusive upper bound: local midnight after `end`.
  pub fn ends_at(&self) -> DateTime<Utc> {
    self.ends_at
  }

  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.starts_at() <= at && at < self.ends_at()
  }

  /// `n` consecutive half-open spans covering the period exactly. Each span is
  /// `total / n` long; the last one absorbs the remainder.
  pub fn buckets(&self, n: u32) -> DomainResult<Vec<BucketSpan>> {
    if n == 0 || n > MAX_BUCKETS {
      return Err(DomainError::validation(format!(
        "Bucket count must be between 1 and {}.",
        MAX_BUCKETS
      )));
    }
    let start = self.starts_at();
    let end = self.ends_at();
    let step_secs = (end - start).num_seconds() / i64::from(n);

    let spans = (0..i64::from(n))
      .map(|i| {
        let span_start = start + Duration::seconds(step_secs * i);
        let span_end = if i == i64::from(n) - 1 {
          end
        } else {
          start + Duration::seconds(step_secs * (i + 1))
        };
        BucketSpan {
          start: span_start,
          end: span_end,
        }
      })
      .collect();
    Ok(spans)
  }
}

/// A revenue-bearing order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueRow {
  pub created_at: DateTime<Utc>,
  pub total_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseRow {
  pub incurred_on: NaiveDate,
  pub category: ExpenseCategory,
  pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBucket {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
  pub revenue_cents: i64,
  pub expense_cents: i64,
  pub net_cents: i64,
  pub order_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
  pub revenue_cents: i64,
  pub expense_cents: i64,
  pub net_cents: i64,
  pub order_count: i64,
  /// Average order value, truncated to whole cents. Zero with no orders.
  pub average_order_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialReport {
  pub period: ReportPeriod,
  pub buckets: Vec<ReportBucket>,
  pub totals: ReportTotals,
  pub expenses_by_category: BTreeMap<ExpenseCategory, i64>,
}

fn bucket_index(spans: &[BucketSpan], at: DateTime<Utc>) -> Option<usize> {
  // Spans are sorted and contiguous.
  let idx = spans.partition_point(|s| s.end <= at);
  spans.get(idx).filter(|s| s.contains(at)).map(|_| idx)
}

pub fn aggregate(
  period: &ReportPeriod,
  bucket_count: u32,
  revenue: &[RevenueRow],
  expenses: &[ExpenseRow],
) -> DomainResult<FinancialReport> {
  let spans = period.buckets(bucket_count)?;
  let mut buckets: Vec<ReportBucket> = spans
    .iter()
    .map(|s| ReportBucket {
      start: s.start,
      end: s.end,
      revenue_cents: 0,
      expense_cents: 0,
      net_cents: 0,
      order_count: 0,
    })
    .collect();
  let mut expenses_by_category = BTreeMap::new();

  for row in revenue {
    if let Some(idx) = bucket_index(&spans, row.created_at) {
      buckets[idx].revenue_cents += row.total_cents;
      buckets[idx].order_count += 1;
    }
  }

  for row in expenses {
    let day_start = local_midnight(row.incurred_on, period.utc_offset_minutes);
    if let Some(idx) = day_start.and_then(|at| bucket_index(&spans, at)) {
      buckets[idx].expense_cents += row.amount_cents;
      *expenses_by_category.entry(row.category).or_insert(0) += row.amount_cents;
    }
  }

  let mut totals = ReportTotals::default();
  for b in &mut buckets {
    b.net_cents = b.revenue_cents - b.expense_cents;
    totals.revenue_cents += b.revenue_cents;
    totals.expense_cents += b.expense_cents;
    totals.order_count += b.order_count;
  }
  totals.net_cents = totals.revenue_cents - totals.expense_cents;
  if totals.order_count > 0 {
    totals.average_order_cents = totals.revenue_cents / totals.order_count;
  }

  Ok(FinancialReport {
    period: *period,
    buckets,
    totals,
    expenses_by_category,
  })
}
