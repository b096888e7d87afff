//! Database operations for the `shop` `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `shop.users` - Customer and admin accounts
//! - `shop.products` - The catalog
//! - `shop.cart_items` - One row per (user, product); the single source of
//!   truth for carts
//! - `shop.orders` / `shop.order_items` - Orders and their snapshot items
//! - `session` - Tower-sessions storage
//!
//! Repositories use the runtime `query_as`/`FromRow` API so the crate builds
//! without a live database. Transactional flows (cart mutations, checkout)
//! expose `*_in` functions that take a `PgConnection`, letting services
//! compose several steps inside one transaction.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p vitrina-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
