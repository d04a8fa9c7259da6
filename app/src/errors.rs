// bakehouse/app/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use bakehouse_core::{DomainError, FlowError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Payment Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl From<DomainError> for AppError {
  fn from(err: DomainError) -> Self {
    match err {
      DomainError::Validation(m) => AppError::Validation(m),
      DomainError::InvalidTransition(m) => AppError::Conflict(m),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// Unique-constraint violations become `Conflict(message)`, anything else
  /// stays a database error.
  pub fn from_unique_violation(err: sqlx::Error, message: impl Into<String>) -> Self {
    if let sqlx::Error::Database(db_err) = &err {
      if db_err.code().as_deref() == Some("23505") {
        return AppError::Conflict(message.into());
      }
    }
    AppError::Sqlx(err)
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) | AppError::Config(_) => {
        tracing::error!(application_error = %self, "Responding with error");
      }
      _ => tracing::warn!(application_error = %self, "Responding with error"),
    }
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Payment(m) => HttpResponse::PaymentRequired().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
      AppError::PipelineHaltedByHandler => {
        HttpResponse::Conflict().json(json!({"error": "Process halted as expected by business logic."}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn domain_errors_map_to_client_statuses() {
    let validation: AppError = DomainError::validation("Quantity must be a positive number.").into();
    assert_eq!(validation.error_response().status(), StatusCode::BAD_REQUEST);

    let transition: AppError = DomainError::transition("Already checked in today.").into();
    assert!(matches!(transition, AppError::Conflict(_)));
    assert_eq!(transition.error_response().status(), StatusCode::CONFLICT);
  }

  #[test]
  fn auth_and_access_failures_are_distinguished() {
    assert_eq!(
      AppError::Auth("Sign in required.".into()).error_response().status(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      AppError::Forbidden("nope".into()).error_response().status(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      AppError::Payment("Add a payment method before checking out.".into())
        .error_response()
        .status(),
      StatusCode::PAYMENT_REQUIRED
    );
  }

  #[test]
  fn anyhow_errors_become_internal_unless_they_wrap_sqlx() {
    let plain: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(plain, AppError::Internal(ref m) if m == "boom"));

    let wrapped: AppError = anyhow::Error::new(sqlx::Error::RowNotFound).into();
    assert!(matches!(wrapped, AppError::Sqlx(sqlx::Error::RowNotFound)));
  }

  #[test]
  fn non_unique_database_errors_are_not_conflicts() {
    let err = AppError::from_unique_violation(sqlx::Error::RowNotFound, "duplicate");
    assert!(matches!(err, AppError::Sqlx(_)));
  }

  #[test]
  fn workflow_errors_are_server_errors() {
    let err: AppError = FlowError::HandlerMissing {
      step_name: "persist_order".to_string(),
    }
    .into();
    assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
