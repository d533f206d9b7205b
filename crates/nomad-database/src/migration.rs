//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use nomad_core::error::{AppError, ErrorKind};

/// Run all pending account-table migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running account store migrations");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::LocalStore,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Account store migrations complete");
    Ok(())
}
