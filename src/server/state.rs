/**
 * Application State Management
 *
 * `AppState` is the central state container shared across request
 * handlers. It holds the PostgreSQL pool and the session token issuer;
 * both are cheap to clone and thread-safe.
 *
 * The `FromRef` implementations let handlers and extractors pull out
 * just the piece they need, following Axum's state pattern.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::sessions::TokenIssuer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: PgPool,
    /// Signs and validates session tokens
    pub tokens: TokenIssuer,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
