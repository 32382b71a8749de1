/**
 * Domain Error Types
 *
 * This module defines the error enum returned by every domain operation.
 * The variants are deliberately distinct so callers can tell validation
 * failures, missing rows, ownership violations, credential problems, and
 * uniqueness conflicts apart; they are never collapsed into a single
 * generic failure.
 *
 * # Error Categories
 *
 * - `Validation` - malformed or missing input caught before persistence
 * - `NotFound` - referenced entity absent, soft-deleted, or status-filtered
 * - `Forbidden` - authenticated but not the owner of the target row
 * - `Unauthorized` - missing/invalid/expired credential or inactive account
 * - `Conflict` - unique constraint violation (email/username on register)
 * - `Database` - underlying store failure; surfaces as a fatal error
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Typed failures surfaced by domain operations
///
/// Propagation is immediate: no local recovery or retry happens below this
/// layer. The HTTP status mapping lives in [`status_code`](Self::status_code)
/// and is only consulted by the response conversion module.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input, caught before any row is written
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Referenced entity absent or excluded by soft-delete/status filters
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Authenticated caller is not the owner of the target row
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Missing, invalid, or expired credential, or account not active
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Unique constraint violation
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Underlying store failure (connection, transaction, decode)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 400 Bad Request
    /// - `NotFound` - 404 Not Found
    /// - `Forbidden` - 403 Forbidden
    /// - `Unauthorized` - 401 Unauthorized
    /// - `Conflict` - 409 Conflict
    /// - `Database` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Database errors are masked: their internals are logged at the
    /// conversion site, never echoed to the client.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { field, message } => format!("{field}: {message}"),
            Self::NotFound { message } => message.clone(),
            Self::Forbidden { message } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::Database(_) => "internal server error".to_string(),
        }
    }
}
