// bakehouse/app/src/web/handlers/expense_handlers.rs

use actix_web::{web, HttpResponse};
use bakehouse_core::expense::{ExpenseCategory, ExpenseDraft};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::DateRangeQuery;
use crate::errors::AppError;
use crate::models::expense::EXPENSE_COLUMNS;
use crate::models::Expense;
use crate::state::AppState;
use crate::web::AuthenticatedUser;

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
  #[serde(flatten)]
  pub range: DateRangeQuery,
  pub category: Option<ExpenseCategory>,
}

#[instrument(name = "handler::list_expenses", skip(app_state, _auth_user))]
pub async fn list_expenses_handler(
  app_state: web::Data<AppState>,
  _auth_user: AuthenticatedUser,
  query: web::Query<ExpenseListQuery>,
) -> Result<HttpResponse, AppError> {
  query.range.validate()?;

  let expenses = sqlx::query_as::<_, Expense>(&format!(
    "SELECT {} FROM expenses \
     WHERE ($1::date IS NULL OR incurred_on >= $1) AND ($2::date IS NULL OR incurred_on <= $2) \
     AND ($3::text IS NULL OR category = $3) \
     ORDER BY incurred_on DESC, created_at DESC",
    EXPENSE_COLUMNS
  ))
  .bind(query.range.from)
  .bind(query.range.to)
  .bind(query.category.map(|c| c.as_str()))
  .fetch_all(&app_state.db_pool)
  .await?;

  let total_cents: i64 = expenses.iter().map(|e| i64::from(e.amount_cents)).sum();
  Ok(HttpResponse::Ok().json(json!({ "expenses": expenses, "total_cents": total_cents })))
}

#[instrument(name = "handler::create_expense", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn create_expense_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ExpenseDraft>,
) -> Result<HttpResponse, AppError> {
  let draft = req_payload.validate(app_state.business_today())?;

  let expense = sqlx::query_as::<_, Expense>(&format!(
    "INSERT INTO expenses (id, category, amount_cents, description, incurred_on, recorded_by) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
    EXPENSE_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(draft.category.as_str())
  .bind(draft.amount_cents)
  .bind(&draft.description)
  .bind(draft.incurred_on)
  .bind(auth_user.id())
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(expense_id = %expense.id, category = %expense.category, amount_cents = expense.amount_cents, "Expense recorded.");
  Ok(HttpResponse::Created().json(expense))
}

#[instrument(name = "handler::update_expense", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn update_expense_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ExpenseDraft>,
) -> Result<HttpResponse, AppError> {
  let expense_id = path.into_inner();
  let draft = req_payload.validate(app_state.business_today())?;

  let expense = sqlx::query_as::<_, Expense>(&format!(
    "UPDATE expenses SET category = $2, amount_cents = $3, description = $4, incurred_on = $5 \
     WHERE id = $1 RETURNING {}",
    EXPENSE_COLUMNS
  ))
  .bind(expense_id)
  .bind(draft.category.as_str())
  .bind(draft.amount_cents)
  .bind(&draft.description)
  .bind(draft.incurred_on)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound(format!("Expense {} not found.", expense_id)))?;

  Ok(HttpResponse::Ok().json(expense))
}

#[instrument(name = "handler::delete_expense", skip_all, fields(admin_id = %auth_user.id()))]
pub async fn delete_expense_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let expense_id = path.into_inner();
  let deleted = sqlx::query("DELETE FROM expenses WHERE id = $1")
    .bind(expense_id)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Expense {} not found.", expense_id)));
  }
  Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn list_query_reads_range_and_category() {
    let query = web::Query::<ExpenseListQuery>::from_query("from=2026-10-01&to=2026-10-18&category=rent").unwrap();
    assert_eq!(query.range.from, chrono::NaiveDate::from_ymd_opt(2026, 10, 1));
    assert_eq!(query.category, Some(ExpenseCategory::Rent));
    assert!(query.range.validate().is_ok());
  }

  #[test]
  fn list_query_rejects_inverted_range() {
    let query = web::Query::<ExpenseListQuery>::from_query("from=2026-10-18&to=2026-10-01").unwrap();
    assert!(matches!(query.range.validate(), Err(AppError::Validation(_))));
  }
}
