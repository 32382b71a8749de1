/**
 * User Model and Database Operations
 *
 * This module holds the user record type and the queries the identity
 * store exposes: lookups by id/email/username, insertion, and the
 * last-login bookkeeping done on successful authentication.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgExecutor;
use sqlx::Row;
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// User account status. Only `Active` users may authenticate or mutate
/// content; the status is re-checked on every claim verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// User record as stored
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    /// Unique, 3-30 chars, letter first, alphanumeric + underscore
    pub username: String,
    pub nickname: Option<String>,
    /// Unique email address
    pub email: String,
    /// bcrypt hash; the plaintext is never stored
    pub password_hash: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Public author projection joined onto articles and comments
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

const USER_COLUMNS: &str = "id, username, nickname, email, password_hash, avatar, bio, role, status, created_at, updated_at, last_login_at";

fn map_user(row: sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        nickname: row.get("nickname"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        avatar: row.get("avatar"),
        bio: row.get("bio"),
        role: UserRole::from_str(row.get::<String, _>("role").as_str()).unwrap_or(UserRole::User),
        status: UserStatus::from_str(row.get::<String, _>("status").as_str())
            .unwrap_or(UserStatus::Inactive),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        last_login_at: row.get("last_login_at"),
    }
}

/// Insert a new user row
///
/// New accounts always start with the `user` role and `active` status.
pub async fn create_user(
    executor: impl PgExecutor<'_>,
    username: &str,
    nickname: Option<&str>,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO users (id, username, nickname, email, password_hash, role, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'user', 'active', $6, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(nickname)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(map_user(row))
}

/// Get user by id
pub async fn find_user_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(map_user))
}

/// Get user by email
pub async fn find_user_by_email(
    executor: impl PgExecutor<'_>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(map_user))
}

/// Get user by username
pub async fn find_user_by_username(
    executor: impl PgExecutor<'_>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(map_user))
}

/// Record a successful login
pub async fn touch_last_login(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
