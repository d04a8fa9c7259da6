// bakehouse/app/src/lib.rs

//! HTTP service for the bakery storefront and back office. The binary in
//! `main.rs` wires these modules into an actix-web server; integration tests
//! build the same `App` from them.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;
