//! Database migration command.
//!
//! The API binary never runs migrations on startup; this command is the
//! only migration path, for development and deploy pipelines alike.

use super::{CliError, connect};

/// Run all pending migrations from `crates/api/migrations/`.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    tracing::info!("Connecting to database...");
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
