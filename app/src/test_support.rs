// bakehouse/app/src/test_support.rs
//
// Database-backed tests run only when BAKEHOUSE_TEST_DATABASE_URL points at a
// scratch PostgreSQL 15+ database; otherwise they return early.

use crate::config::AppConfig;
use crate::state::AppState;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_DATABASE_ENV: &str = "BAKEHOUSE_TEST_DATABASE_URL";

pub async fn database_state() -> Option<AppState> {
  let Ok(url) = std::env::var(TEST_DATABASE_ENV) else {
    eprintln!("{} not set; skipping database test.", TEST_DATABASE_ENV);
    return None;
  };
  let pool = PgPoolOptions::new()
    .max_connections(4)
    .connect(&url)
    .await
    .expect("test database should be reachable");
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("migrations should apply");
  Some(AppState::new(pool, Arc::new(AppConfig::for_database(url))))
}

pub async fn insert_customer(pool: &PgPool) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO profiles (id, email, password_hash, full_name) VALUES ($1, $2, 'unused', 'Test Customer')")
    .bind(id)
    .bind(format!("{}@test.bakehouse", id))
    .execute(pool)
    .await
    .expect("insert profile");
  id
}

pub async fn insert_product(pool: &PgPool, name: &str, price_cents: i32) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO products (id, name, price_cents) VALUES ($1, $2, $3)")
    .bind(id)
    .bind(name)
    .bind(price_cents)
    .execute(pool)
    .await
    .expect("insert product");
  id
}

pub async fn insert_cart_line(pool: &PgPool, profile_id: Uuid, product_id: Uuid, quantity: i32) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO cart_items (id, profile_id, product_id, quantity) VALUES ($1, $2, $3, $4)")
    .bind(id)
    .bind(profile_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await
    .expect("insert cart line");
  id
}

pub async fn insert_default_card(pool: &PgPool, profile_id: Uuid) -> Uuid {
  let id = Uuid::new_v4();
  sqlx::query(
    "INSERT INTO payment_methods (id, profile_id, brand, last4, exp_month, exp_year, holder_name, is_default) \
     VALUES ($1, $2, 'visa', '4242', 12, 2099, 'Test Customer', TRUE)",
  )
  .bind(id)
  .bind(profile_id)
  .execute(pool)
  .await
  .expect("insert card");
  id
}
