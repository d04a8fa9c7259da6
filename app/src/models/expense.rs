// bakehouse/app/src/models/expense.rs

use bakehouse_core::expense::ExpenseCategory;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const EXPENSE_COLUMNS: &str = "id, category, amount_cents, description, incurred_on, recorded_by, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
  pub id: Uuid,
  #[sqlx(try_from = "String")]
  pub category: ExpenseCategory,
  pub amount_cents: i32,
  pub description: Option<String>,
  pub incurred_on: NaiveDate,
  pub recorded_by: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}
