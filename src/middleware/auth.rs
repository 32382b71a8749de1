/**
 * Authentication Extractor
 *
 * Protected handlers take an [`AuthUser`] parameter. The extractor pulls
 * the bearer token from the Authorization header, checks signature and
 * expiry, and then re-resolves the user row so revoked or deactivated
 * accounts fail immediately, not at token expiry.
 */

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::auth::service::verify_claim;
use crate::auth::users::User;
use crate::error::DomainError;
use crate::server::state::AppState;

/// Extract the bearer token from an Authorization header
///
/// Expects the `Bearer <token>` format.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Axum extractor for the authenticated user
///
/// Carries the freshly resolved user row; handlers mostly use its id for
/// ownership checks.
#[derive(Debug)]
pub struct AuthUser(pub User);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = DomainError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            DomainError::unauthorized("missing bearer token")
        })?;

        let user = verify_claim(&state.pool, &state.tokens, token).await?;

        Ok(AuthUser(user))
    }
}
