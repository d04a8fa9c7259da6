// bakehouse-core/src/expense.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
  Ingredients,
  Utilities,
  Rent,
  Salaries,
  Equipment,
  Marketing,
  Other,
}

impl ExpenseCategory {
  pub const ALL: [ExpenseCategory; 7] = [
    ExpenseCategory::Ingredients,
    ExpenseCategory::Utilities,
    ExpenseCategory::Rent,
    ExpenseCategory::Salaries,
    ExpenseCategory::Equipment,
    ExpenseCategory::Marketing,
    ExpenseCategory::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ExpenseCategory::Ingredients => "ingredients",
      ExpenseCategory::Utilities => "utilities",
      ExpenseCategory::Rent => "rent",
      ExpenseCategory::Salaries => "salaries",
      ExpenseCategory::Equipment => "equipment",
      ExpenseCategory::Marketing => "marketing",
      ExpenseCategory::Other => "other",
    }
  }
}

impl fmt::Display for ExpenseCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ExpenseCategory {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ExpenseCategory::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| DomainError::validation(format!("Unknown expense category '{}'.", s)))
  }
}

impl TryFrom<String> for ExpenseCategory {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseDraft {
  pub category: ExpenseCategory,
  pub amount_cents: i32,
  pub description: Option<String>,
  pub incurred_on: NaiveDate,
}

impl ExpenseDraft {
  pub fn validate(&self, today: NaiveDate) -> DomainResult<ExpenseDraft> {
    if self.amount_cents <= 0 {
      return Err(DomainError::validation("Amount must be greater than 0."));
    }
    if self.incurred_on > today {
      return Err(DomainError::validation("Expense date cannot be in the future."));
    }
    Ok(ExpenseDraft {
      description: self
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string),
      ..self.clone()
    })
  }
}
