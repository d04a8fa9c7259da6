// bakehouse-core/src/pricing.rs

//! Cart pricing: unit prices, tax, delivery fee and totals, all in cents.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
  /// Basis points; 825 is 8.25 %.
  pub tax_rate_bps: u32,
  pub delivery_fee_cents: i64,
  /// Subtotal at or above which delivery is free.
  pub free_delivery_threshold_cents: i64,
}

impl Default for PricingPolicy {
  fn default() -> Self {
    Self {
      tax_rate_bps: 0,
      delivery_fee_cents: 500,
      free_delivery_threshold_cents: 5000,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
  pub unit_price_cents: i64,
  pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
  pub item_count: i64,
  pub subtotal_cents: i64,
  pub tax_cents: i64,
  pub delivery_fee_cents: i64,
  pub total_cents: i64,
}

pub fn unit_price_cents(base_price_cents: i32, size_modifier_cents: Option<i32>) -> i64 {
  i64::from(base_price_cents) + i64::from(size_modifier_cents.unwrap_or(0))
}

pub fn validate_quantity(quantity: i32) -> DomainResult<i32> {
  if quantity <= 0 {
    return Err(DomainError::validation("Quantity must be a positive number."));
  }
  if quantity > MAX_LINE_QUANTITY {
    return Err(DomainError::validation(format!(
      "Quantity cannot exceed {} per item.",
      MAX_LINE_QUANTITY
    )));
  }
  Ok(quantity)
}

/// Rounds half up: 0.5 cent of tax becomes 1 cent.
fn tax_for(subtotal_cents: i64, tax_rate_bps: u32) -> i64 {
  (subtotal_cents * i64::from(tax_rate_bps) + 5_000) / 10_000
}

pub fn price_cart(lines: &[CartLine], policy: &PricingPolicy) -> DomainResult<CartTotals> {
  let mut totals = CartTotals::default();
  for line in lines {
    if line.quantity <= 0 {
      return Err(DomainError::validation("Cart contains a line with a non-positive quantity."));
    }
    totals.item_count += i64::from(line.quantity);
    totals.subtotal_cents += line.unit_price_cents * i64::from(line.quantity);
  }

  totals.tax_cents = tax_for(totals.subtotal_cents, policy.tax_rate_bps);
  totals.delivery_fee_cents = if lines.is_empty() || totals.subtotal_cents >= policy.free_delivery_threshold_cents {
    0
  } else {
    policy.delivery_fee_cents
  };
  totals.total_cents = totals.subtotal_cents + totals.tax_cents + totals.delivery_fee_cents;
  Ok(totals)
}

/// "$12.50" style display used in log lines and order summaries.
pub fn format_cents(cents: i64, currency: &str) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  let symbol = match currency {
    "USD" | "CAD" | "AUD" => "$",
    "EUR" => "€",
    "GBP" => "£",
    _ => "",
  };
  if symbol.is_empty() {
    format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, currency)
  } else {
    format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
  }
}
