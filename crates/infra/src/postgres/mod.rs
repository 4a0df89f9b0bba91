//! Postgres-backed repositories.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (foreign key violation) | `23503` | `ForeignKeyViolation` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / PoolTimedOut / Io / decode | N/A | `Unavailable` |
//!
//! Uniqueness and parent existence are left to the schema's indexes and
//! foreign keys, so concurrent writers race on the database, not on a
//! read-then-write in this process.

mod accounts;
mod buildings;
mod subscriptions;
mod units;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use realty_core::StoreError;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Repositories over one shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool with a bounded size and acquire timeout.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the schema. Every statement is idempotent.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&*self.pool).await?;
        tracing::info!("database schema applied");
        Ok(())
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some("23505") => StoreError::UniqueViolation(constraint),
                Some("23503") => StoreError::ForeignKeyViolation(constraint),
                _ => StoreError::unavailable(format!(
                    "database error in {}: {}",
                    operation,
                    db_err.message()
                )),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::unavailable(format!("connection pool timed out in {}", operation))
        }
        _ => StoreError::unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
