// bakehouse/app/src/pipelines/mod.rs

//! Every multi-step action is a pipeline registered here, keyed by the type of
//! its context data. Handlers build the context and call `workflows.run`.

use crate::errors::AppError;
use crate::state::AppState;
use bakehouse_core::FlowRegistry;

pub mod contexts;

pub mod attendance_pipeline;
pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod payment_method_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;
pub mod user_removal_pipeline;

pub fn register_all_pipelines(workflows: &FlowRegistry<AppError>, app_state: &AppState) {
  tracing::info!("Registering pipelines...");

  signup_pipeline::register_signup_pipeline(workflows, app_state);
  signin_pipeline::register_signin_pipeline(workflows, app_state);
  cart_pipeline::register_add_to_cart_pipeline(workflows, app_state);
  checkout_pipeline::register_checkout_pipeline(workflows, app_state);
  payment_method_pipeline::register_add_payment_method_pipeline(workflows, app_state);
  attendance_pipeline::register_attendance_pipeline(workflows, app_state);
  user_removal_pipeline::register_user_removal_pipeline(workflows, app_state);

  tracing::info!(count = workflows.len(), "All application pipelines registered.");
}
