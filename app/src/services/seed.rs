// bakehouse/app/src/services/seed.rs

//! Optional first-run data: default categories and sizes, inserted only when
//! the tables are empty.

use bakehouse_core::catalog::slugify;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result;

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
  ("Breads", "Loaves, baguettes and rolls baked daily."),
  ("Cakes", "Whole cakes for celebrations."),
  ("Pastries", "Croissants, danishes and other laminated doughs."),
  ("Cookies", "Cookies and biscuits."),
];

/// (name, servings, price modifier in cents)
const DEFAULT_SIZES: &[(&str, i32, i32)] = &[("Small", 4, 0), ("Medium", 8, 1200), ("Large", 12, 2200)];

#[instrument(name = "seed::seed_defaults", skip(db_pool), err(Display))]
pub async fn seed_defaults(db_pool: &PgPool) -> Result<()> {
  let mut tx = db_pool.begin().await?;

  let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
    .fetch_one(&mut *tx)
    .await?;
  if categories == 0 {
    for (name, description) in DEFAULT_CATEGORIES {
      sqlx::query("INSERT INTO categories (id, name, slug, description) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(slugify(name))
        .bind(*description)
        .execute(&mut *tx)
        .await?;
    }
    info!(count = DEFAULT_CATEGORIES.len(), "Seeded default categories.");
  }

  let sizes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sizes").fetch_one(&mut *tx).await?;
  if sizes == 0 {
    for (name, capacity, modifier) in DEFAULT_SIZES {
      sqlx::query("INSERT INTO sizes (id, name, capacity, price_modifier_cents) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(*capacity)
        .bind(*modifier)
        .execute(&mut *tx)
        .await?;
    }
    info!(count = DEFAULT_SIZES.len(), "Seeded default sizes.");
  }

  tx.commit().await?;
  Ok(())
}
