/**
 * Server Initialization
 *
 * Assembles the running application: connects the database pool, runs
 * migrations, builds the token issuer, and wires the router. Any failure
 * here aborts startup; the service is useless without its store.
 */

use axum::Router;
use sqlx::PgPool;

use crate::auth::sessions::TokenIssuer;
use crate::routes::router::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Steps
///
/// 1. Connect the PostgreSQL pool
/// 2. Run pending migrations
/// 3. Build the token issuer from the configured secret
/// 4. Create the router with shared state
///
/// # Errors
///
/// Returns `sqlx::Error` when the pool cannot be created or migrations
/// fail to apply.
pub async fn create_app(config: &AppConfig) -> Result<Router, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {:?}", e);
        sqlx::Error::from(e)
    })?;
    tracing::info!("Database migrations completed");

    let state = AppState {
        pool,
        tokens: TokenIssuer::new(&config.jwt_secret),
    };

    Ok(create_router(state))
}
