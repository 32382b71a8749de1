/**
 * Router Configuration
 *
 * Assembles all HTTP routes into a single Axum router. Handlers that
 * mutate state pull the caller identity through the `AuthUser` extractor;
 * read endpoints are public.
 */

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::article::handlers as articles;
use crate::auth::handlers as auth;
use crate::comment::handlers as comments;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `state` - Shared application state (pool, token issuer)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Authentication endpoints
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Article endpoints
        .route("/api/articles", get(articles::list).post(articles::create))
        .route(
            "/api/articles/{id}",
            get(articles::get)
                .put(articles::update)
                .delete(articles::remove),
        )
        .route("/api/articles/{id}/publish", post(articles::publish))
        .route("/api/articles/{id}/like", post(articles::toggle_like))
        .route("/api/articles/{id}/save", post(articles::toggle_save))
        // Comment endpoints
        .route("/api/comments", post(comments::create))
        .route(
            "/api/comments/article/{article_id}",
            get(comments::list_by_article),
        )
        .route("/api/comments/user/{user_id}", get(comments::list_by_user))
        .route(
            "/api/comments/{id}",
            get(comments::get)
                .put(comments::update)
                .delete(comments::remove),
        )
        .route("/api/comments/{id}/replies", get(comments::list_replies))
        .route(
            "/api/comments/{id}/like",
            post(comments::like).delete(comments::unlike),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
