use bakehouse_core::expense::ExpenseCategory;
use bakehouse_core::report::{aggregate, ExpenseRow, ReportPeriod, RevenueRow};
use bakehouse_core::{ContextData, FlowError, FlowRegistry, Pipeline, PipelineControl};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
}

fn pipeline_with_steps(num_steps: usize) -> Pipeline<BenchContext, FlowError> {
  let names: Vec<String> = (0..num_steps).map(|i| format!("step_{}", i)).collect();
  let defs: Vec<(&str, bool, Option<_>)> = names.iter().map(|n| (n.as_str(), false, None)).collect();
  let mut p = Pipeline::<BenchContext, FlowError>::new(&defs);
  for name in &names {
    p.on(name, |ctx: ContextData<BenchContext>| async move {
      ctx.write().counter += 1;
      Ok::<_, FlowError>(PipelineControl::Continue)
    });
  }
  p
}

fn bench_registry_dispatch(c: &mut Criterion) {
  let rt = Runtime::new().expect("tokio runtime");
  let mut group = c.benchmark_group("registry_dispatch");

  for num_steps in [1usize, 4, 8] {
    let registry = FlowRegistry::<FlowError>::new();
    registry.register_pipeline(pipeline_with_steps(num_steps));
    group.throughput(Throughput::Elements(num_steps as u64));
    group.bench_with_input(BenchmarkId::from_parameter(num_steps), &num_steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        let ctx = ContextData::new(BenchContext::default());
        registry.run(ctx).await.expect("pipeline run");
      });
    });
  }
  group.finish();
}

fn bench_report_aggregation(c: &mut Criterion) {
  let start = NaiveDate::from_ymd_opt(2026, 1, 1).expect("date");
  let end = NaiveDate::from_ymd_opt(2026, 12, 31).expect("date");
  let period = ReportPeriod::new(start, end).expect("period");
  let origin = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

  let revenue: Vec<RevenueRow> = (0..20_000i64)
    .map(|i| RevenueRow {
      created_at: origin + Duration::minutes(i * 26),
      total_cents: 500 + i % 4_000,
    })
    .collect();
  let expenses: Vec<ExpenseRow> = (0..2_000u64)
    .map(|i| ExpenseRow {
      incurred_on: start + chrono::Days::new(i % 365),
      category: ExpenseCategory::ALL[(i % 7) as usize],
      amount_cents: 1_000,
    })
    .collect();

  let mut group = c.benchmark_group("report_aggregation");
  group.throughput(Throughput::Elements((revenue.len() + expenses.len()) as u64));
  for buckets in [12u32, 52, 365] {
    group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &n| {
      b.iter(|| aggregate(&period, n, &revenue, &expenses).expect("aggregate"));
    });
  }
  group.finish();
}

criterion_group!(benches, bench_registry_dispatch, bench_report_aggregation);
criterion_main!(benches);
