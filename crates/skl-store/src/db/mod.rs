//! # Database Persistence Layer
//!
//! Postgres persistence for the four record tables via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, writes
//! to the in-memory store are mirrored here and the store is reloaded from
//! Postgres at startup. When absent, the stack operates in in-memory-only
//! mode (suitable for development and testing).
//!
//! Every query carries an `organization_id` filter — tenant isolation is
//! enforced at the query level, mirroring the row-level security of the
//! hosted deployment.
//!
//! Rows that fail boundary validation (unknown status strings) are skipped
//! with a logged error rather than failing the whole load.

pub mod erasures;
pub mod incidents;
pub mod licenses;
pub mod reports;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
