// tests/pipeline_execution_tests.rs
mod common;

use bakehouse_core::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult};
use common::*;
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn three_step_pipeline() -> Pipeline<TestContext, TestError> {
  let mut p = Pipeline::<TestContext, TestError>::new(&[
    ("validate", false, None),
    ("load", false, None),
    ("persist", false, None),
  ]);
  p.on("validate", create_simple_handler("validate", "v"));
  p.on("load", create_simple_handler("load", "l"));
  p.on("persist", create_simple_handler("persist", "p"));
  p
}

#[tokio::test]
#[serial]
async fn runs_steps_in_declared_order() {
  setup_tracing();
  reset_counters();
  let p = three_step_pipeline();
  let ctx = ContextData::new(TestContext::default());

  let result = p.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Completed));
  let guard = ctx.read();
  assert_eq!(guard.steps_executed, vec!["validate", "load", "persist"]);
  assert_eq!(guard.message, "vlp");
  assert_eq!(HANDLER_EXEC_COUNTER.load(Ordering::SeqCst), 3);
}

#[tokio::test]
#[serial]
async fn stop_signal_halts_remaining_steps() {
  setup_tracing();
  reset_counters();
  let p = three_step_pipeline();
  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("load".to_string()),
    ..Default::default()
  });

  let result = p.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Stopped));
  assert_eq!(ctx.read().steps_executed, vec!["validate", "load"]);
  assert_eq!(HANDLER_EXEC_COUNTER.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn first_handler_error_is_returned_and_aborts_run() {
  setup_tracing();
  let mut p = Pipeline::<TestContext, TestError>::new(&[("validate", false, None), ("persist", false, None)]);
  p.on("validate", create_failing_handler("validate", "quantity must be positive"));
  p.on("persist", create_simple_handler("persist", "p"));
  let ctx = ContextData::new(TestContext::default());

  let result = p.run(ctx.clone()).await;

  assert_eq!(result, Err(TestError::Handler("quantity must be positive".to_string())));
  assert_eq!(ctx.read().steps_executed, vec!["validate"]);
}

#[tokio::test]
async fn required_step_without_handler_fails() {
  setup_tracing();
  let mut p = Pipeline::<TestContext, TestError>::new(&[("validate", false, None), ("persist", false, None)]);
  p.on("validate", create_simple_handler("validate", "v"));

  let err = p.run(ContextData::new(TestContext::default())).await.unwrap_err();

  match err {
    TestError::Flow(msg) => assert!(msg.contains("HandlerMissing") && msg.contains("persist"), "{}", msg),
    other => panic!("unexpected error: {:?}", other),
  }
}

#[tokio::test]
async fn optional_step_without_handler_is_skipped() {
  setup_tracing();
  let mut p = Pipeline::<TestContext, TestError>::new(&[("validate", false, None), ("notify", true, None)]);
  p.on("validate", create_simple_handler("validate", "v"));
  let ctx = ContextData::new(TestContext::default());

  assert_eq!(p.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().steps_executed, vec!["validate"]);
}

#[tokio::test]
async fn skip_condition_is_evaluated_against_current_context() {
  setup_tracing();
  let skip_when_flagged = Arc::new(|ctx: ContextData<TestContext>| ctx.read().skip_optional);
  let mut p = Pipeline::<TestContext, TestError>::new(&[
    ("flag", false, None),
    ("maybe", false, Some(skip_when_flagged)),
    ("last", false, None),
  ]);
  p.on("flag", |ctx: ContextData<TestContext>| async move {
    let mut guard = ctx.write();
    guard.skip_optional = true;
    guard.steps_executed.push("flag".to_string());
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  p.on("maybe", create_simple_handler("maybe", "m"));
  p.on("last", create_simple_handler("last", "z"));
  let ctx = ContextData::new(TestContext::default());

  assert_eq!(p.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().steps_executed, vec!["flag", "last"]);
}

#[tokio::test]
async fn multiple_handlers_on_one_step_run_in_attach_order() {
  setup_tracing();
  let mut p = Pipeline::<TestContext, TestError>::new(&[("persist", false, None)]);
  p.on("persist", create_simple_handler("persist", "a"));
  p.on("persist", create_simple_handler("persist", "b"));
  let ctx = ContextData::new(TestContext::default());

  p.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "ab");
  assert_eq!(ctx.read().counter, 2);
}

#[tokio::test]
async fn handler_errors_convert_through_into() {
  setup_tracing();
  let mut p = Pipeline::<TestContext, TestError>::new(&[("engine", false, None)]);
  p.on("engine", |_ctx: ContextData<TestContext>| async move {
    Err::<PipelineControl, FlowError>(FlowError::Internal("boom".to_string()))
  });

  let err = p.run(ContextData::new(TestContext::default())).await.unwrap_err();
  assert!(matches!(err, TestError::Flow(ref m) if m.contains("boom")));
}

#[test]
fn step_mutation_helpers() {
  let mut p = three_step_pipeline();
  p.insert_after_step("load", "price", true, None);
  assert_eq!(p.step_names(), vec!["validate", "load", "price", "persist"]);

  p.remove_step("load");
  assert_eq!(p.step_names(), vec!["validate", "price", "persist"]);

  p.remove_step("does_not_exist");
  assert_eq!(p.step_names().len(), 3);

  p.set_optional("price", false);
  p.set_skip_condition("price", None);
}

#[test]
#[should_panic(expected = "not found")]
fn attaching_to_unknown_step_panics() {
  let mut p = Pipeline::<TestContext, TestError>::new(&[("validate", false, None)]);
  p.on("valdate", create_simple_handler("valdate", "x"));
}

#[test]
fn context_data_clones_share_state() {
  let a = ContextData::new(TestContext::default());
  let b = a.clone();
  b.write().counter = 7;
  assert_eq!(a.read().counter, 7);

  let _read = a.read();
  assert!(b.try_write().is_none());
  assert!(b.try_read().is_some());
}
