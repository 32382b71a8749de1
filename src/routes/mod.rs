//! Route Configuration Module
//!
//! Configures all HTTP routes for the server, organized by aggregate.
//!
//! - **`router`** - Main router creation and route assembly
//!
//! # Route Types
//!
//! ## Auth Routes
//!
//! - `POST /api/auth/register` - User registration
//! - `POST /api/auth/login` - User login
//! - `GET /api/auth/me` - Get current user
//!
//! ## Article Routes
//!
//! - `GET /api/articles` - List articles with filters
//! - `POST /api/articles` - Create article
//! - `GET /api/articles/{id}` - Article detail (counts a view)
//! - `PUT /api/articles/{id}` - Update article
//! - `DELETE /api/articles/{id}` - Soft-delete article
//! - `POST /api/articles/{id}/publish` - Publish article
//! - `POST /api/articles/{id}/like` - Toggle like
//! - `POST /api/articles/{id}/save` - Toggle save
//!
//! ## Comment Routes
//!
//! - `POST /api/comments` - Create comment
//! - `GET /api/comments/article/{articleId}` - Threaded comments for an article
//! - `GET /api/comments/user/{userId}` - One user's comments
//! - `GET /api/comments/{id}` - Single comment
//! - `GET /api/comments/{id}/replies` - Direct replies
//! - `PUT /api/comments/{id}` - Edit comment
//! - `DELETE /api/comments/{id}` - Delete comment
//! - `POST /api/comments/{id}/like` - Like comment
//! - `DELETE /api/comments/{id}/like` - Unlike comment

/// Main router creation
pub mod router;

pub use router::create_router;
