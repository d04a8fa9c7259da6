// bakehouse-core/src/catalog.rs

//! Validation for products, categories and sizes.

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};

pub const PRODUCT_NAME_MAX: usize = 120;
pub const PRODUCT_DESCRIPTION_MAX: usize = 2000;
pub const CATEGORY_NAME_MAX: usize = 60;
pub const SIZE_NAME_MAX: usize = 40;

fn required_text(field: &str, value: &str, max: usize) -> DomainResult<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(DomainError::validation(format!("{} is required.", field)));
  }
  if trimmed.chars().count() > max {
    return Err(DomainError::validation(format!(
      "{} must be at most {} characters.",
      field, max
    )));
  }
  Ok(trimmed.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i32,
  pub image_url: Option<String>,
  #[serde(default = "default_available")]
  pub is_available: bool,
}

fn default_available() -> bool {
  true
}

impl ProductDraft {
  /// Returns a normalized copy: trimmed text, empty optionals dropped.
  pub fn validate(&self) -> DomainResult<ProductDraft> {
    let name = required_text("Product name", &self.name, PRODUCT_NAME_MAX)?;
    if self.price_cents <= 0 {
      return Err(DomainError::validation("Price must be greater than 0."));
    }
    let description = optional_text(self.description.as_deref());
    if let Some(d) = &description {
      if d.chars().count() > PRODUCT_DESCRIPTION_MAX {
        return Err(DomainError::validation(format!(
          "Description must be at most {} characters.",
          PRODUCT_DESCRIPTION_MAX
        )));
      }
    }
    let image_url = optional_text(self.image_url.as_deref());
    if let Some(url) = &image_url {
      if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(DomainError::validation("Image URL must start with http:// or https://."));
      }
    }
    Ok(ProductDraft {
      name,
      description,
      price_cents: self.price_cents,
      image_url,
      is_available: self.is_available,
    })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
  pub name: String,
  pub description: Option<String>,
}

impl CategoryDraft {
  /// Returns the trimmed name, its slug and the trimmed description.
  pub fn validate(&self) -> DomainResult<(String, String, Option<String>)> {
    let name = required_text("Category name", &self.name, CATEGORY_NAME_MAX)?;
    let slug = slugify(&name);
    if slug.is_empty() {
      return Err(DomainError::validation("Category name must contain letters or digits."));
    }
    Ok((name, slug, optional_text(self.description.as_deref())))
  }
}

/// Lowercase ASCII alphanumerics, every other run of characters collapsed to
/// one `-`, no leading or trailing dash.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_dash = false;
  for c in name.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_dash = true;
    }
  }
  slug
}

#[derive(Debug, Clone, Deserialize)]
pub struct SizeDraft {
  pub name: String,
  /// Servings the size feeds.
  pub capacity: i32,
  #[serde(default)]
  pub price_modifier_cents: i32,
}

impl SizeDraft {
  pub fn validate(&self) -> DomainResult<SizeDraft> {
    let name = required_text("Size name", &self.name, SIZE_NAME_MAX)?;
    if self.capacity <= 0 {
      return Err(DomainError::validation("Capacity must be greater than 0."));
    }
    if self.price_modifier_cents < 0 {
      return Err(DomainError::validation("Price modifier cannot be negative."));
    }
    Ok(SizeDraft {
      name,
      capacity: self.capacity,
      price_modifier_cents: self.price_modifier_cents,
    })
  }
}
