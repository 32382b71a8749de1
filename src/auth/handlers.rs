/**
 * Authentication Handlers
 *
 * HTTP handlers for registration, login, and the current-user endpoint,
 * plus their request/response types. Handlers validate nothing beyond
 * JSON shape; domain validation lives in the service layer.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::auth::service::{self, Registration};
use crate::auth::users::User;
use crate::envelope::ApiResponse;
use crate::error::DomainError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub nickname: Option<String>,
    pub email: String,
    /// Hashed before storage, never persisted as given
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the signed claim plus a safe user projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// User projection without the credential hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub nickname: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            nickname: user.nickname,
            email: user.email,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
            last_login_at: user.last_login_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, DomainError> {
    tracing::info!(
        "Register request for username: {}, email: {}",
        request.username,
        request.email
    );

    let user = service::register(
        &state.pool,
        Registration {
            username: request.username,
            nickname: request.nickname,
            email: request.email,
            password: request.password,
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, DomainError> {
    tracing::info!("Login request for: {}", request.email);

    let (user, token) =
        service::authenticate(&state.pool, &state.tokens, &request.email, &request.password)
            .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        access_token: token,
        user: user.into(),
    })))
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(user.into()))
}
