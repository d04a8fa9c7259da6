// tests/report_tests.rs

use bakehouse_core::expense::ExpenseCategory;
use bakehouse_core::report::{aggregate, ExpenseRow, RangePreset, ReportPeriod, RevenueRow};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn period_rejects_inverted_range() {
  assert!(ReportPeriod::new(date(2026, 10, 10), date(2026, 10, 9)).is_err());
  let single = ReportPeriod::new(date(2026, 10, 10), date(2026, 10, 10)).unwrap();
  assert_eq!(single.days(), 1);
}

#[test]
fn buckets_partition_the_period() {
  let period = ReportPeriod::new(date(2026, 10, 1), date(2026, 10, 10)).unwrap();
  let spans = period.buckets(3).unwrap();

  assert_eq!(spans.len(), 3);
  assert_eq!(spans[0].start, period.starts_at());
  assert_eq!(spans[2].end, period.ends_at());
  for pair in spans.windows(2) {
    assert_eq!(pair[0].end, pair[1].start);
  }
  // 10 days / 3 = 3 days 8 hours
  assert_eq!(spans[0].end - spans[0].start, Duration::hours(80));
}

#[test]
fn bucket_count_bounds() {
  let period = ReportPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
  assert!(period.buckets(0).is_err());
  assert!(period.buckets(367).is_err());
  assert_eq!(period.buckets(31).unwrap().len(), 31);
}

#[test]
fn presets_end_today() {
  let today = date(2026, 10, 18);
  let week = ReportPeriod::from_preset(RangePreset::Week, today, 0).unwrap();
  assert_eq!(week.start, date(2026, 10, 12));
  assert_eq!(week.end, today);
  assert_eq!(week.days(), 7);
  assert_eq!(RangePreset::Year.default_buckets(), 12);
  assert_eq!(ReportPeriod::from_preset(RangePreset::Year, today, 0).unwrap().days(), 365);
}

#[test]
fn aggregates_revenue_and_expenses_per_bucket() {
  let period = ReportPeriod::new(date(2026, 10, 1), date(2026, 10, 4)).unwrap();
  let revenue = [
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
      total_cents: 2_000,
    },
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 2, 23, 59, 59).unwrap(),
      total_cents: 1_000,
    },
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 4, 12, 0, 0).unwrap(),
      total_cents: 500,
    },
    // Outside the period on both sides.
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap(),
      total_cents: 9_999,
    },
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 5, 0, 0, 0).unwrap(),
      total_cents: 9_999,
    },
  ];
  let expenses = [
    ExpenseRow {
      incurred_on: date(2026, 10, 1),
      category: ExpenseCategory::Ingredients,
      amount_cents: 700,
    },
    ExpenseRow {
      incurred_on: date(2026, 10, 3),
      category: ExpenseCategory::Utilities,
      amount_cents: 300,
    },
    ExpenseRow {
      incurred_on: date(2026, 10, 3),
      category: ExpenseCategory::Ingredients,
      amount_cents: 100,
    },
    ExpenseRow {
      incurred_on: date(2026, 11, 1),
      category: ExpenseCategory::Rent,
      amount_cents: 50_000,
    },
  ];

  let report = aggregate(&period, 2, &revenue, &expenses).unwrap();

  assert_eq!(report.buckets.len(), 2);
  let first = &report.buckets[0];
  let second = &report.buckets[1];
  assert_eq!((first.revenue_cents, first.order_count, first.expense_cents), (3_000, 2, 700));
  assert_eq!((second.revenue_cents, second.order_count, second.expense_cents), (500, 1, 400));
  assert_eq!(second.net_cents, 100);

  assert_eq!(report.totals.revenue_cents, 3_500);
  assert_eq!(report.totals.expense_cents, 1_100);
  assert_eq!(report.totals.net_cents, 2_400);
  assert_eq!(report.totals.order_count, 3);
  assert_eq!(report.totals.average_order_cents, 1_166);
  assert_eq!(report.expenses_by_category.get(&ExpenseCategory::Ingredients), Some(&800));
  assert_eq!(report.expenses_by_category.get(&ExpenseCategory::Rent), None);
}

#[test]
fn empty_period_reports_zeroes() {
  let period = ReportPeriod::new(date(2026, 10, 1), date(2026, 10, 7)).unwrap();
  let report = aggregate(&period, 7, &[], &[]).unwrap();
  assert_eq!(report.buckets.len(), 7);
  assert!(report.buckets.iter().all(|b| b.revenue_cents == 0 && b.net_cents == 0));
  assert_eq!(report.totals.average_order_cents, 0);

  let json = serde_json::to_value(&report).unwrap();
  assert_eq!(json["totals"]["order_count"], 0);
  assert_eq!(json["buckets"].as_array().unwrap().len(), 7);
}

#[test]
fn period_rejects_dates_without_a_following_midnight() {
  let last = NaiveDate::MAX;
  assert!(ReportPeriod::new(last, last).is_err());
  assert!(ReportPeriod::from_preset(RangePreset::Week, last, 0).is_err());
  assert!(ReportPeriod::new(NaiveDate::MIN, NaiveDate::MIN).is_ok());
  assert!(ReportPeriod::with_utc_offset(NaiveDate::MIN, NaiveDate::MIN, 60).is_err());
}

#[test]
fn period_rejects_offsets_of_a_day_or_more() {
  let day = date(2026, 10, 18);
  assert!(ReportPeriod::with_utc_offset(day, day, 24 * 60).is_err());
  assert!(ReportPeriod::with_utc_offset(day, day, -24 * 60).is_err());
  assert!(ReportPeriod::with_utc_offset(day, day, -(24 * 60 - 1)).is_ok());
}

#[test]
fn days_follow_business_midnight_west_of_utc() {
  // UTC-5: local Oct 18 runs from 05:00Z on Oct 18 to 05:00Z on Oct 19.
  let today = date(2026, 10, 18);
  let period = ReportPeriod::from_preset(RangePreset::Week, today, -300).unwrap();
  assert_eq!(period.starts_at(), Utc.with_ymd_and_hms(2026, 10, 12, 5, 0, 0).unwrap());
  assert_eq!(period.ends_at(), Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap());

  let revenue = [
    // 20:00 local on Oct 18.
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap(),
      total_cents: 1_200,
    },
    // 23:30 local on Oct 11, before the period.
    RevenueRow {
      created_at: Utc.with_ymd_and_hms(2026, 10, 12, 4, 30, 0).unwrap(),
      total_cents: 9_999,
    },
  ];
  let expenses = [ExpenseRow {
    incurred_on: date(2026, 10, 12),
    category: ExpenseCategory::Rent,
    amount_cents: 400,
  }];
  let report = aggregate(&period, 7, &revenue, &expenses).unwrap();

  let last = report.buckets.last().unwrap();
  assert_eq!((last.revenue_cents, last.order_count), (1_200, 1));
  assert_eq!(report.buckets[0].expense_cents, 400);
  assert_eq!(report.totals.revenue_cents, 1_200);
}

#[test]
fn days_follow_business_midnight_east_of_utc() {
  // UTC+2: an order at 01:00 local on Oct 2 is 23:00Z on Oct 1.
  let period = ReportPeriod::with_utc_offset(date(2026, 10, 1), date(2026, 10, 2), 120).unwrap();
  let revenue = [RevenueRow {
    created_at: Utc.with_ymd_and_hms(2026, 10, 1, 23, 0, 0).unwrap(),
    total_cents: 800,
  }];
  let report = aggregate(&period, 2, &revenue, &[]).unwrap();

  assert_eq!(report.buckets[0].start, Utc.with_ymd_and_hms(2026, 9, 30, 22, 0, 0).unwrap());
  assert_eq!(report.buckets[0].order_count, 0);
  assert_eq!(report.buckets[1].revenue_cents, 800);

  let json = serde_json::to_value(&report).unwrap();
  assert_eq!(json["period"]["utc_offset_minutes"], 120);
}
