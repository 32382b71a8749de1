//! Inkpost - Main Library
//!
//! Inkpost is a blog platform backend built on Axum and PostgreSQL,
//! providing article publishing with a draft/published lifecycle,
//! threaded comments, and token-based sessions.
//!
//! # Module Structure
//!
//! - **`auth`** - Identity store, registration/login, session tokens
//! - **`article`** - Article aggregate: lifecycle, counters, reactions
//! - **`comment`** - Comment aggregate: one-level threading, moderation states
//! - **`envelope`** - Uniform response envelope and pagination
//! - **`error`** - Domain error type and its HTTP mapping
//! - **`middleware`** - Request extractors (bearer authentication)
//! - **`routes`** - HTTP route assembly
//! - **`server`** - Configuration, shared state, initialization
//!
//! # Usage
//!
//! ```rust,no_run
//! use inkpost::server::{create_app, AppConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! // Use app with an Axum server
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, DomainError>`. The error
//! type carries its own HTTP status mapping and serializes into the
//! same response envelope as successful payloads.

/// Article aggregate: lifecycle, counters, reactions
pub mod article;

/// Identity store and session tokens
pub mod auth;

/// Comment aggregate: threading and moderation
pub mod comment;

/// Response envelope and pagination
pub mod envelope;

/// Domain errors and HTTP conversion
pub mod error;

/// Request extractors
pub mod middleware;

/// HTTP route assembly
pub mod routes;

/// Configuration, state, and initialization
pub mod server;
