// src/lib.rs

//! Bakehouse core: the I/O-free half of the bakery storefront and dashboard.
//!
//! Two kinds of things live here:
//!  - `flow`: a small async step pipeline and a type-keyed registry. Every
//!    multi-step action of the HTTP layer (signup, checkout, attendance marks,
//!    user removal, ...) is a named sequence of steps over a shared context.
//!  - Domain rules: validation of drafts, cart pricing, card checks, attendance
//!    arithmetic, report bucketing and the role-to-route access table.

pub mod access;
pub mod attendance;
pub mod catalog;
pub mod error;
pub mod expense;
pub mod flow;
pub mod order;
pub mod payment;
pub mod pricing;
pub mod report;
pub mod schedule;

// --- Re-exports for the Public API ---

pub use crate::flow::context_data::ContextData;
pub use crate::flow::control::{PipelineControl, PipelineResult};
pub use crate::flow::pipeline::{Handler, Pipeline};
pub use crate::flow::registry::FlowRegistry;
pub use crate::flow::step::{SkipCondition, StepDef};

pub use crate::error::{DomainError, DomainResult, FlowError, FlowResult};

pub use crate::access::Role;
pub use crate::order::OrderStatus;
