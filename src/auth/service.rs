/**
 * Identity Operations
 *
 * Registration, authentication, and claim verification. Handlers call
 * these with already-parsed arguments; everything returns plain data or
 * a typed [`DomainError`].
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt (`DEFAULT_COST`); plaintext is never
 *   stored or logged.
 * - Unknown email, wrong password, and non-active accounts all fail
 *   authentication with one identical message so callers cannot enumerate
 *   accounts.
 * - Claim verification re-resolves the user row: a token outlives neither
 *   the account nor its active status.
 */

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::sessions::TokenIssuer;
use crate::auth::users::{self, User};
use crate::error::DomainError;

const BAD_CREDENTIALS: &str = "invalid email or password";

/// Validated registration input
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub nickname: Option<String>,
    pub email: String,
    pub password: String,
}

/// Validate username format
///
/// Usernames must be 3-30 characters, start with a letter, and contain
/// only alphanumeric characters and underscores.
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_registration(reg: &Registration) -> Result<(), DomainError> {
    if !is_valid_username(&reg.username) {
        return Err(DomainError::validation(
            "username",
            "must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !reg.email.contains('@') {
        return Err(DomainError::validation("email", "invalid email format"));
    }
    if reg.password.len() < 8 {
        return Err(DomainError::validation(
            "password",
            "must be at least 8 characters",
        ));
    }
    Ok(())
}

/// Map a unique-constraint violation from the store to a Conflict
///
/// The pre-insert lookups catch duplicates in the common case, but two
/// concurrent registrations can both pass them; the database constraint
/// is the backstop and its violation is still a Conflict, not a store
/// failure.
pub fn conflict_on_unique_violation(err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            if db_err.constraint().is_some_and(|c| c.contains("email")) {
                DomainError::conflict("email already registered")
            } else {
                DomainError::conflict("username already taken")
            }
        }
        other => DomainError::Database(other),
    }
}

/// Register a new user
///
/// Fails with `Conflict` when the email or username is already taken.
pub async fn register(pool: &PgPool, reg: Registration) -> Result<User, DomainError> {
    validate_registration(&reg)?;

    if users::find_user_by_email(pool, &reg.email).await?.is_some() {
        tracing::warn!("Registration rejected, email taken: {}", reg.email);
        return Err(DomainError::conflict("email already registered"));
    }

    if users::find_user_by_username(pool, &reg.username)
        .await?
        .is_some()
    {
        tracing::warn!("Registration rejected, username taken: {}", reg.username);
        return Err(DomainError::conflict("username already taken"));
    }

    let password_hash = hash(&reg.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        DomainError::validation("password", "could not be processed")
    })?;

    let user = users::create_user(
        pool,
        &reg.username,
        reg.nickname.as_deref(),
        &reg.email,
        &password_hash,
    )
    .await
    .map_err(conflict_on_unique_violation)?;

    tracing::info!("User registered: {} ({})", user.username, user.email);
    Ok(user)
}

/// Authenticate by email and password, returning the user and a signed claim
///
/// All failure modes return one identical generic message.
pub async fn authenticate(
    pool: &PgPool,
    tokens: &TokenIssuer,
    email: &str,
    password: &str,
) -> Result<(User, String), DomainError> {
    let user = users::find_user_by_email(pool, email)
        .await?
        .ok_or_else(|| DomainError::unauthorized(BAD_CREDENTIALS))?;

    let valid = verify(password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        DomainError::unauthorized(BAD_CREDENTIALS)
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(DomainError::unauthorized(BAD_CREDENTIALS));
    }

    if !user.is_active() {
        tracing::warn!("Login attempt on non-active account: {}", user.username);
        return Err(DomainError::unauthorized(BAD_CREDENTIALS));
    }

    users::touch_last_login(pool, user.id).await?;

    let token = tokens.issue(user.id, &user.username, &user.email)?;
    tracing::info!("User logged in: {}", user.username);

    Ok((user, token))
}

/// Resolve a bearer token to the current user row
///
/// Signature and expiry are checked first; the account is then looked up
/// fresh, so deleted or deactivated users fail even with a live token.
pub async fn verify_claim(
    pool: &PgPool,
    tokens: &TokenIssuer,
    token: &str,
) -> Result<User, DomainError> {
    let claims = tokens.verify(token)?;
    let user_id = claims.user_id()?;

    let user = users::find_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| DomainError::unauthorized("account no longer exists"))?;

    if !user.is_active() {
        return Err(DomainError::unauthorized("account is not active"));
    }

    Ok(user)
}
