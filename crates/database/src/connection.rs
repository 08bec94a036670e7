use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL comes from `database.url` in the settings, falling back to
/// `DATABASE_URL` (a `.env` file is loaded if present). The pool is shared
/// across the entire application.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = match &settings.url {
        Some(url) => url.clone(),
        None => {
            // A missing .env file is fine; the variable may already be exported.
            dotenvy::dotenv().ok();
            env::var("DATABASE_URL").map_err(|_e| {
                DbError::ConnectionConfigError(
                    "database.url or DATABASE_URL must be set.".to_string(),
                )
            })?
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to PostgreSQL."
    );
    Ok(pool)
}

/// Applies the embedded SQL migrations, bringing the schema up to date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}
