// bakehouse/app/src/services/mod.rs

pub mod auth_service;
pub mod seed;
