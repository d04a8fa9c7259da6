// bakehouse-core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failures raised by the flow engine itself, as opposed to the handlers it runs.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Type mismatch during context downcast (expected {expected_type})")]
  TypeMismatch { expected_type: String },

  #[error("No pipeline registered for context type {type_name}")]
  NotRegistered { type_name: String },

  #[error("Error in pipeline handler. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    FlowError::Handler { source: err }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;

/// Business-rule violations. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  InvalidTransition(String),
}

impl DomainError {
  pub fn validation(msg: impl Into<String>) -> Self {
    DomainError::Validation(msg.into())
  }

  pub fn transition(msg: impl Into<String>) -> Self {
    DomainError::InvalidTransition(msg.into())
  }
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
