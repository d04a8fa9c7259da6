// tests/domain_rules_tests.rs

use bakehouse_core::access::{allowed_roles, can_access, requires_auth, Role};
use bakehouse_core::catalog::{slugify, CategoryDraft, ProductDraft, SizeDraft};
use bakehouse_core::expense::{ExpenseCategory, ExpenseDraft};
use bakehouse_core::order::OrderStatus;
use bakehouse_core::payment::{luhn_valid, CardBrand, CardDraft};
use bakehouse_core::pricing::{format_cents, price_cart, unit_price_cents, validate_quantity, CartLine, PricingPolicy};
use bakehouse_core::schedule::ScheduleDraft;
use bakehouse_core::DomainError;
use chrono::{NaiveDate, NaiveTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Catalog ---

#[test]
fn size_capacity_must_be_positive() {
  for capacity in [0, -3] {
    let draft = SizeDraft {
      name: "Family".to_string(),
      capacity,
      price_modifier_cents: 0,
    };
    assert_eq!(
      draft.validate().unwrap_err(),
      DomainError::Validation("Capacity must be greater than 0.".to_string())
    );
  }

  let ok = SizeDraft {
    name: "  Large ".to_string(),
    capacity: 12,
    price_modifier_cents: 800,
  }
  .validate()
  .unwrap();
  assert_eq!(ok.name, "Large");
}

#[test]
fn size_rejects_negative_modifier() {
  let draft = SizeDraft {
    name: "Small".to_string(),
    capacity: 4,
    price_modifier_cents: -1,
  };
  assert!(draft.validate().is_err());
}

#[test]
fn product_draft_normalizes_and_bounds() {
  let draft = ProductDraft {
    name: "  Sourdough Loaf ".to_string(),
    description: Some("   ".to_string()),
    price_cents: 650,
    image_url: Some("https://cdn.example.com/loaf.jpg".to_string()),
    is_available: true,
  };
  let valid = draft.validate().unwrap();
  assert_eq!(valid.name, "Sourdough Loaf");
  assert_eq!(valid.description, None);

  let free = ProductDraft { price_cents: 0, ..draft.clone() };
  assert!(free.validate().is_err());

  let bad_url = ProductDraft {
    image_url: Some("ftp://example.com/x.png".to_string()),
    ..draft.clone()
  };
  assert!(bad_url.validate().is_err());

  let nameless = ProductDraft {
    name: " ".to_string(),
    ..draft
  };
  assert!(nameless.validate().is_err());
}

#[test]
fn category_slug() {
  assert_eq!(slugify("Cakes & Tortes"), "cakes-tortes");
  assert_eq!(slugify("  Croissants!! "), "croissants");
  assert_eq!(slugify("Gluten-free  Breads 2"), "gluten-free-breads-2");

  let (name, slug, description) = CategoryDraft {
    name: " Pastries ".to_string(),
    description: None,
  }
  .validate()
  .unwrap();
  assert_eq!((name.as_str(), slug.as_str(), description), ("Pastries", "pastries", None));

  let symbols_only = CategoryDraft {
    name: "!!!".to_string(),
    description: None,
  };
  assert!(symbols_only.validate().is_err());
}

// --- Pricing ---

#[test]
fn cart_totals_with_tax_and_delivery() {
  let policy = PricingPolicy {
    tax_rate_bps: 825,
    delivery_fee_cents: 500,
    free_delivery_threshold_cents: 5000,
  };
  let lines = [
    CartLine {
      unit_price_cents: unit_price_cents(450, Some(150)),
      quantity: 2,
    },
    CartLine {
      unit_price_cents: unit_price_cents(325, None),
      quantity: 1,
    },
  ];

  let totals = price_cart(&lines, &policy).unwrap();
  assert_eq!(totals.item_count, 3);
  assert_eq!(totals.subtotal_cents, 1525);
  // 1525 * 0.0825 = 125.8125 -> 126
  assert_eq!(totals.tax_cents, 126);
  assert_eq!(totals.delivery_fee_cents, 500);
  assert_eq!(totals.total_cents, 1525 + 126 + 500);
}

#[test]
fn delivery_is_free_at_threshold_and_for_empty_cart() {
  let policy = PricingPolicy::default();
  let at_threshold = [CartLine {
    unit_price_cents: 2500,
    quantity: 2,
  }];
  assert_eq!(price_cart(&at_threshold, &policy).unwrap().delivery_fee_cents, 0);

  let empty = price_cart(&[], &policy).unwrap();
  assert_eq!(empty.total_cents, 0);
  assert_eq!(empty.delivery_fee_cents, 0);
}

#[test]
fn tax_rounds_half_up() {
  let policy = PricingPolicy {
    tax_rate_bps: 500,
    delivery_fee_cents: 0,
    free_delivery_threshold_cents: 0,
  };
  // 10 * 5% = 0.5 -> 1
  let lines = [CartLine {
    unit_price_cents: 10,
    quantity: 1,
  }];
  assert_eq!(price_cart(&lines, &policy).unwrap().tax_cents, 1);
}

#[test]
fn quantity_bounds() {
  assert!(validate_quantity(0).is_err());
  assert!(validate_quantity(100).is_err());
  assert_eq!(validate_quantity(99), Ok(99));
  let bad = [CartLine {
    unit_price_cents: 100,
    quantity: -1,
  }];
  assert!(price_cart(&bad, &PricingPolicy::default()).is_err());
}

#[test]
fn cents_display() {
  assert_eq!(format_cents(1250, "USD"), "$12.50");
  assert_eq!(format_cents(-5, "EUR"), "-€0.05");
  assert_eq!(format_cents(100, "JPY"), "1.00 JPY");
}

// --- Payment ---

#[test]
fn luhn_checks() {
  assert!(luhn_valid("4242 4242 4242 4242"));
  assert!(luhn_valid("5555-5555-5555-4444"));
  assert!(luhn_valid("378282246310005"));
  assert!(!luhn_valid("4242 4242 4242 4241"));
  assert!(!luhn_valid("4242a42424242424"));
  assert!(!luhn_valid("0000000"));
  assert!(!luhn_valid(""));
}

#[test]
fn brand_detection() {
  assert_eq!(CardBrand::detect("4111111111111111"), CardBrand::Visa);
  assert_eq!(CardBrand::detect("5105105105105100"), CardBrand::Mastercard);
  assert_eq!(CardBrand::detect("2223003122003222"), CardBrand::Mastercard);
  assert_eq!(CardBrand::detect("371449635398431"), CardBrand::Amex);
  assert_eq!(CardBrand::detect("6011111111111117"), CardBrand::Discover);
  assert_eq!(CardBrand::detect("3566002020360505"), CardBrand::Other);
}

fn card(number: &str, month: u32, year: i32, cvc: &str) -> CardDraft {
  CardDraft {
    card_number: number.to_string(),
    holder_name: "Ada Baker".to_string(),
    exp_month: month,
    exp_year: year,
    cvc: cvc.to_string(),
  }
}

#[test]
fn card_draft_validation() {
  let today = date(2026, 10, 18);

  let summary = card("4242 4242 4242 4242", 12, 28, "123").validate(today).unwrap();
  assert_eq!(summary.brand, CardBrand::Visa);
  assert_eq!(summary.last4, "4242");
  assert_eq!(summary.exp_year, 2028);

  // Luhn-invalid
  assert_eq!(
    card("4242 4242 4242 4241", 12, 2028, "123").validate(today).unwrap_err(),
    DomainError::Validation("Card number is invalid.".to_string())
  );
  // Current month is still valid, previous month is not
  assert!(card("4242424242424242", 10, 2026, "123").validate(today).is_ok());
  assert!(card("4242424242424242", 9, 2026, "123").validate(today).is_err());
  assert!(card("4242424242424242", 13, 2030, "123").validate(today).is_err());
  // Amex needs four digits
  assert!(card("378282246310005", 1, 2030, "123").validate(today).is_err());
  assert!(card("378282246310005", 1, 2030, "1234").validate(today).is_ok());

  let debug = format!("{:?}", card("4242424242424242", 1, 2030, "987"));
  assert!(debug.contains("****4242"));
  assert!(!debug.contains("4242424242424242"));
  assert!(!debug.contains("987"));
}

// --- Schedules & expenses ---

#[test]
fn schedule_end_after_start() {
  let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
  let draft = ScheduleDraft {
    work_date: date(2026, 10, 19),
    start_time: t(6, 0),
    end_time: t(14, 30),
    notes: Some(" opening shift ".to_string()),
  };
  let valid = draft.validate().unwrap();
  assert_eq!(valid.scheduled_minutes(), 510);
  assert_eq!(valid.notes.as_deref(), Some("opening shift"));

  let inverted = ScheduleDraft {
    start_time: t(14, 0),
    end_time: t(6, 0),
    ..draft.clone()
  };
  assert!(inverted.validate().is_err());

  let zero_length = ScheduleDraft {
    end_time: t(6, 0),
    ..draft
  };
  assert!(zero_length.validate().is_err());
}

#[test]
fn expense_validation() {
  let today = date(2026, 10, 18);
  let draft = ExpenseDraft {
    category: ExpenseCategory::Ingredients,
    amount_cents: 12_000,
    description: Some("Flour, 10 sacks".to_string()),
    incurred_on: today,
  };
  assert!(draft.validate(today).is_ok());
  assert!(ExpenseDraft { amount_cents: 0, ..draft.clone() }.validate(today).is_err());
  assert!(ExpenseDraft {
    incurred_on: date(2026, 10, 19),
    ..draft
  }
  .validate(today)
  .is_err());
  assert_eq!("rent".parse::<ExpenseCategory>(), Ok(ExpenseCategory::Rent));
  assert!("snacks".parse::<ExpenseCategory>().is_err());
}

// --- Orders ---

#[test]
fn order_status_transitions() {
  use OrderStatus::*;
  assert_eq!(Pending.transition_to(Confirmed), Ok(Confirmed));
  assert_eq!(Confirmed.transition_to(Baking), Ok(Baking));
  assert_eq!(Baking.transition_to(Ready), Ok(Ready));
  assert_eq!(Ready.transition_to(Completed), Ok(Completed));
  assert!(Completed.transition_to(Pending).is_err());
  assert!(Baking.transition_to(Cancelled).is_err());
  assert!(!Cancelled.counts_as_revenue());
  assert!(Completed.counts_as_revenue());
  assert_eq!(OrderStatus::try_from("ready".to_string()), Ok(Ready));
  assert_eq!(serde_json::to_string(&Baking).unwrap(), "\"baking\"");
}

// --- Access ---

#[test]
fn access_table_longest_prefix() {
  assert_eq!(allowed_roles("/api/v1/admin/users"), Some(&[Role::Admin][..]));
  assert!(can_access(Role::Admin, "/api/v1/admin/reports/financial"));
  assert!(!can_access(Role::Staff, "/api/v1/admin/reports/financial"));
  assert!(can_access(Role::Staff, "/api/v1/admin/orders/123/status"));
  assert!(!can_access(Role::Customer, "/api/v1/admin/orders"));
  assert!(can_access(Role::Staff, "/api/v1/staff/attendance/check-in"));
  assert!(!can_access(Role::Customer, "/api/v1/staff/schedules"));
  assert!(can_access(Role::Customer, "/api/v1/cart/items"));
}

#[test]
fn access_table_public_paths() {
  assert!(!requires_auth("/api/v1/products"));
  assert!(!requires_auth("/api/v1/auth/signin"));
  assert!(!requires_auth("/api/v1/carts"));
  assert!(requires_auth("/api/v1/cart"));
  assert!(requires_auth("/api/v1/checkout"));
  for role in Role::ALL {
    assert!(can_access(role, "/api/v1/health"));
  }
}

#[test]
fn role_parsing() {
  assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
  assert!("baker".parse::<Role>().is_err());
  assert!(Role::Staff.is_staff());
  assert!(!Role::Customer.is_staff());
}
