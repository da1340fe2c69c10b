//! Connection pool construction and migrations.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Settings;

fn options(settings: &Settings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(5))
}

/// Open the connection pool described by `settings.database`.
pub async fn connect(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let pool = options(settings).connect(&settings.database.url).await?;
    tracing::info!(
        max_connections = settings.database.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// A pool that only connects when first used.
pub fn connect_lazy(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    options(settings).connect_lazy(&settings.database.url)
}

/// Apply the migrations under `packages/api/migrations`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}
