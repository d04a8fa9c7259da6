// bakehouse-core/src/access.rs

//! Role-to-route access table.
//!
//! Lookup is by longest matching path prefix; a path that matches no entry is
//! public. Prefixes only match on segment boundaries, so `/api/v1/carts` is not
//! covered by `/api/v1/cart`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Customer,
  Staff,
  Admin,
}

impl Role {
  pub const ALL: [Role; 3] = [Role::Customer, Role::Staff, Role::Admin];

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Customer => "customer",
      Role::Staff => "staff",
      Role::Admin => "admin",
    }
  }

  pub fn is_staff(&self) -> bool {
    matches!(self, Role::Staff | Role::Admin)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "customer" => Ok(Role::Customer),
      "staff" => Ok(Role::Staff),
      "admin" => Ok(Role::Admin),
      other => Err(DomainError::validation(format!("Unknown role '{}'.", other))),
    }
  }
}

impl TryFrom<String> for Role {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

const ANY_SIGNED_IN: &[Role] = &[Role::Customer, Role::Staff, Role::Admin];
const STAFF_AND_ADMIN: &[Role] = &[Role::Staff, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// `(path prefix, roles allowed)`.
pub static ROUTE_ACCESS: &[(&str, &[Role])] = &[
  ("/api/v1/admin", ADMIN_ONLY),
  ("/api/v1/admin/orders", STAFF_AND_ADMIN),
  ("/api/v1/staff", STAFF_AND_ADMIN),
  ("/api/v1/cart", ANY_SIGNED_IN),
  ("/api/v1/checkout", ANY_SIGNED_IN),
  ("/api/v1/orders", ANY_SIGNED_IN),
  ("/api/v1/payment-methods", ANY_SIGNED_IN),
  ("/api/v1/auth/me", ANY_SIGNED_IN),
  ("/api/v1/auth/signout", ANY_SIGNED_IN),
];

fn prefix_matches(prefix: &str, path: &str) -> bool {
  match path.strip_prefix(prefix) {
    Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
    None => false,
  }
}

/// Roles allowed on `path`, or `None` when the path is public.
pub fn allowed_roles(path: &str) -> Option<&'static [Role]> {
  ROUTE_ACCESS
    .iter()
    .filter(|(prefix, _)| prefix_matches(prefix, path))
    .max_by_key(|(prefix, _)| prefix.len())
    .map(|(_, roles)| *roles)
}

pub fn requires_auth(path: &str) -> bool {
  allowed_roles(path).is_some()
}

pub fn can_access(role: Role, path: &str) -> bool {
  match allowed_roles(path) {
    Some(roles) => roles.contains(&role),
    None => true,
  }
}
