//! Domain fixtures for integration tests
//!
//! Helpers that create users, articles, and comments through the same
//! service layer the handlers use.

use sqlx::PgPool;
use uuid::Uuid;

use inkpost::article::model::{ArticleStatus, NewArticle};
use inkpost::article::{self, ArticleWithAuthor};
use inkpost::auth::service::{register, Registration};
use inkpost::auth::users::User;
use inkpost::comment::model::Provenance;
use inkpost::comment::{self, CommentWithAuthor};

/// Register a user with a derived email and a fixed password
pub async fn create_user(pool: &PgPool, username: &str) -> User {
    register(
        pool,
        Registration {
            username: username.to_string(),
            nickname: None,
            email: format!("{}@example.com", username),
            password: "hunter2hunter2".to_string(),
        },
    )
    .await
    .expect("Failed to register test user")
}

/// Create an article in the given lifecycle state
pub async fn create_article(
    pool: &PgPool,
    author_id: Uuid,
    status: ArticleStatus,
) -> ArticleWithAuthor {
    article::service::create(
        pool,
        author_id,
        NewArticle {
            title: "Fixture article".to_string(),
            content: "Some body text long enough to matter.".to_string(),
            summary: Some("A fixture".to_string()),
            cover_image: None,
            category_ids: vec![1],
            tag_ids: Some(vec![1, 2]),
            status,
        },
    )
    .await
    .expect("Failed to create test article")
}

/// Create a published top-level comment
pub async fn create_comment(
    pool: &PgPool,
    article_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
) -> CommentWithAuthor {
    comment::service::create(
        pool,
        "A fixture comment".to_string(),
        article_id,
        author_id,
        parent_id,
        Provenance::default(),
    )
    .await
    .expect("Failed to create test comment")
}

/// Current comment_count for an article, read straight from the table
pub async fn article_comment_count(pool: &PgPool, article_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT comment_count FROM articles WHERE id = $1")
        .bind(article_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read comment_count")
}
