// bakehouse/app/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use bakehouse_core::FlowRegistry;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub workflows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every pipeline.
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    let state = AppState {
      db_pool,
      workflows: Arc::new(FlowRegistry::<AppError>::new()),
      config,
    };
    crate::pipelines::register_all_pipelines(&state.workflows, &state);
    state
  }

  /// Today's date in the bakery's local time.
  pub fn business_today(&self) -> NaiveDate {
    let offset = FixedOffset::east_opt(self.config.business_utc_offset_minutes * 60)
      .unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
  }
}
