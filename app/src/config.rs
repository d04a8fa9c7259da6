// bakehouse/app/src/config.rs

use crate::errors::{AppError, Result};
use bakehouse_core::pricing::PricingPolicy;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl LogFormat {
  /// `LOG_FORMAT=json` selects JSON lines; anything else is human-readable.
  pub fn from_env() -> Self {
    match env::var("LOG_FORMAT").unwrap_or_default().trim().to_lowercase().as_str() {
      "json" => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub seed_db: bool,

  pub session_ttl_hours: i64,
  /// Signing up with this email grants the admin role.
  pub bootstrap_admin_email: Option<String>,

  pub pricing: PricingPolicy,
  pub currency: String,

  /// Offset of the bakery's local time from UTC; decides which day an
  /// attendance mark belongs to.
  pub business_utc_offset_minutes: i32,
  pub late_grace_minutes: i64,

  pub log_format: LogFormat,
}

fn parse_or<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
    Err(_) => Ok(default),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_or::<u16>("SERVER_PORT", 8080)?;
    let database_url = env::var("DATABASE_URL")
      .map_err(|e| AppError::Config(format!("Missing environment variable 'DATABASE_URL': {}", e)))?;
    let database_max_connections = parse_or::<u32>("DATABASE_MAX_CONNECTIONS", 10)?;
    let run_migrations = parse_or::<bool>("RUN_MIGRATIONS", true)?;
    let seed_db = parse_or::<bool>("SEED_DB", false)?;

    let session_ttl_hours = parse_or::<i64>("SESSION_TTL_HOURS", 168)?;
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }
    let bootstrap_admin_email = env::var("BOOTSTRAP_ADMIN_EMAIL")
      .ok()
      .map(|e| e.trim().to_lowercase())
      .filter(|e| !e.is_empty());

    let pricing = PricingPolicy {
      tax_rate_bps: parse_or::<u32>("TAX_RATE_BPS", 0)?,
      delivery_fee_cents: parse_or::<i64>("DELIVERY_FEE_CENTS", 500)?,
      free_delivery_threshold_cents: parse_or::<i64>("FREE_DELIVERY_THRESHOLD_CENTS", 5000)?,
    };
    let currency = env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string()).to_uppercase();

    let business_utc_offset_minutes = parse_or::<i32>("BUSINESS_UTC_OFFSET_MINUTES", 0)?;
    if business_utc_offset_minutes.abs() >= 24 * 60 {
      return Err(AppError::Config(
        "BUSINESS_UTC_OFFSET_MINUTES must be within +/- 1439".to_string(),
      ));
    }
    let late_grace_minutes = parse_or::<i64>("LATE_GRACE_MINUTES", 5)?;

    let log_format = LogFormat::from_env();

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      run_migrations,
      seed_db,
      session_ttl_hours,
      bootstrap_admin_email,
      pricing,
      currency,
      business_utc_offset_minutes,
      late_grace_minutes,
      log_format,
    })
  }

  /// Defaults for tests and tooling that never read the environment.
  pub fn for_database(database_url: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: database_url.into(),
      database_max_connections: 5,
      run_migrations: false,
      seed_db: false,
      session_ttl_hours: 168,
      bootstrap_admin_email: None,
      pricing: PricingPolicy::default(),
      currency: "USD".to_string(),
      business_utc_offset_minutes: 0,
      late_grace_minutes: 5,
      log_format: LogFormat::Pretty,
    }
  }
}
