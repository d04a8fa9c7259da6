// bakehouse-core/src/order.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Baking,
  Ready,
  Completed,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Confirmed => "confirmed",
      OrderStatus::Baking => "baking",
      OrderStatus::Ready => "ready",
      OrderStatus::Completed => "completed",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  pub fn can_transition_to(&self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
      (self, next),
      (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Baking) | (Confirmed, Cancelled) | (Baking, Ready) | (Ready, Completed)
    )
  }

  pub fn transition_to(&self, next: OrderStatus) -> DomainResult<OrderStatus> {
    if self.can_transition_to(next) {
      Ok(next)
    } else {
      Err(DomainError::transition(format!(
        "Order cannot move from {} to {}.",
        self, next
      )))
    }
  }

  /// Cancelled orders are excluded from revenue.
  pub fn counts_as_revenue(&self) -> bool {
    !matches!(self, OrderStatus::Cancelled)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(OrderStatus::Pending),
      "confirmed" => Ok(OrderStatus::Confirmed),
      "baking" => Ok(OrderStatus::Baking),
      "ready" => Ok(OrderStatus::Ready),
      "completed" => Ok(OrderStatus::Completed),
      "cancelled" => Ok(OrderStatus::Cancelled),
      other => Err(DomainError::validation(format!("Unknown order status '{}'.", other))),
    }
  }
}

impl TryFrom<String> for OrderStatus {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}
