// bakehouse-core/src/payment.rs

//! Card checks for saved payment methods. Only a summary (brand, last four,
//! expiry, holder) ever leaves this module.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
  Visa,
  Mastercard,
  Amex,
  Discover,
  Other,
}

impl CardBrand {
  pub fn as_str(&self) -> &'static str {
    match self {
      CardBrand::Visa => "visa",
      CardBrand::Mastercard => "mastercard",
      CardBrand::Amex => "amex",
      CardBrand::Discover => "discover",
      CardBrand::Other => "other",
    }
  }

  /// Brand from the leading digits of a digits-only number.
  pub fn detect(digits: &str) -> CardBrand {
    let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok());
    if digits.starts_with('4') {
      return CardBrand::Visa;
    }
    if let Some(p2) = prefix(2) {
      if (51..=55).contains(&p2) {
        return CardBrand::Mastercard;
      }
      if p2 == 34 || p2 == 37 {
        return CardBrand::Amex;
      }
      if p2 == 65 {
        return CardBrand::Discover;
      }
    }
    if let Some(p4) = prefix(4) {
      if (2221..=2720).contains(&p4) {
        return CardBrand::Mastercard;
      }
      if p4 == 6011 {
        return CardBrand::Discover;
      }
    }
    CardBrand::Other
  }
}

impl fmt::Display for CardBrand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CardBrand {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "visa" => Ok(CardBrand::Visa),
      "mastercard" => Ok(CardBrand::Mastercard),
      "amex" => Ok(CardBrand::Amex),
      "discover" => Ok(CardBrand::Discover),
      "other" => Ok(CardBrand::Other),
      other => Err(DomainError::validation(format!("Unknown card brand '{}'.", other))),
    }
  }
}

impl TryFrom<String> for CardBrand {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Strips spaces and dashes. `None` if anything other than digits remains.
pub fn normalize_card_number(raw: &str) -> Option<String> {
  let digits: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();
  if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  Some(digits)
}

/// Luhn checksum over a card number of 12 to 19 digits.
pub fn luhn_valid(raw: &str) -> bool {
  let digits = match normalize_card_number(raw) {
    Some(d) => d,
    None => return false,
  };
  if !(12..=19).contains(&digits.len()) {
    return false;
  }
  let sum: u32 = digits
    .bytes()
    .rev()
    .enumerate()
    .map(|(i, b)| {
      let d = u32::from(b - b'0');
      if i % 2 == 1 {
        let doubled = d * 2;
        if doubled > 9 {
          doubled - 9
        } else {
          doubled
        }
      } else {
        d
      }
    })
    .sum();
  sum % 10 == 0
}

#[derive(Clone, Deserialize)]
pub struct CardDraft {
  pub card_number: String,
  pub holder_name: String,
  pub exp_month: u32,
  pub exp_year: i32,
  pub cvc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
  pub brand: CardBrand,
  pub last4: String,
  pub exp_month: u32,
  pub exp_year: i32,
  pub holder_name: String,
}

/// Two-digit years are read as 20xx.
fn full_year(year: i32) -> i32 {
  if (0..100).contains(&year) {
    2000 + year
  } else {
    year
  }
}

impl CardDraft {
  pub fn validate(&self, today: NaiveDate) -> DomainResult<CardSummary> {
    let digits = normalize_card_number(&self.card_number)
      .ok_or_else(|| DomainError::validation("Card number may only contain digits, spaces and dashes."))?;
    if !luhn_valid(&digits) {
      return Err(DomainError::validation("Card number is invalid."));
    }

    let holder_name = self.holder_name.trim();
    if holder_name.is_empty() {
      return Err(DomainError::validation("Cardholder name is required."));
    }

    if !(1..=12).contains(&self.exp_month) {
      return Err(DomainError::validation("Expiry month must be between 1 and 12."));
    }
    let exp_year = full_year(self.exp_year);
    // Valid through the last day of the expiry month.
    if (exp_year, self.exp_month) < (today.year(), today.month()) {
      return Err(DomainError::validation("Card has expired."));
    }

    let brand = CardBrand::detect(&digits);
    let cvc_len = if brand == CardBrand::Amex { 4 } else { 3 };
    let cvc = self.cvc.trim();
    if cvc.len() != cvc_len || !cvc.chars().all(|c| c.is_ascii_digit()) {
      return Err(DomainError::validation(format!("Security code must be {} digits.", cvc_len)));
    }

    Ok(CardSummary {
      brand,
      last4: digits[digits.len() - 4..].to_string(),
      exp_month: self.exp_month,
      exp_year,
      holder_name: holder_name.to_string(),
    })
  }
}

// Never print the full number or the CVC.
impl fmt::Debug for CardDraft {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    f.debug_struct("CardDraft")
      .field("card_number", &format!("****{}", tail))
      .field("holder_name", &self.holder_name)
      .field("exp_month", &self.exp_month)
      .field("exp_year", &self.exp_year)
      .field("cvc", &"***")
      .finish()
  }
}
