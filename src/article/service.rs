/**
 * Article Operations
 *
 * The article aggregate's domain operations. Each function runs against
 * the store, enforces ownership and visibility rules, and returns plain
 * data or a typed [`DomainError`]; nothing here knows about HTTP.
 */

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::article::db;
use crate::article::model::{
    Article, ArticleFilter, ArticlePatch, ArticleStatus, ArticleWithAuthor, NewArticle,
};
use crate::auth::users;
use crate::envelope::{PageMeta, Pagination};
use crate::error::DomainError;

/// Outcome of a like toggle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: i32,
}

/// Outcome of a save toggle
#[derive(Debug, Serialize)]
pub struct SaveOutcome {
    pub saved: bool,
}

/// Create an article
///
/// The referenced author must exist; a missing author is a validation
/// failure, not a not-found, because the id came from the caller's input.
/// `published_at` is set when the article is born published.
pub async fn create(
    pool: &PgPool,
    author_id: Uuid,
    data: NewArticle,
) -> Result<ArticleWithAuthor, DomainError> {
    data.validate()?;

    if users::find_user_by_id(pool, author_id).await?.is_none() {
        return Err(DomainError::validation("authorId", "user does not exist"));
    }

    let published_at = (data.status == ArticleStatus::Published).then(Utc::now);
    let article = db::insert_article(pool, author_id, &data, published_at).await?;

    tracing::info!("Article created: {} by {}", article.id, author_id);

    db::find_article_with_author(pool, article.id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))
}

/// List articles matching the filter
///
/// Soft-deleted rows never appear, regardless of filters. Sorted by
/// creation time descending; the limit is clamped to [1, 100].
pub async fn list(
    pool: &PgPool,
    filter: ArticleFilter,
    pagination: Pagination,
) -> Result<(Vec<ArticleWithAuthor>, PageMeta), DomainError> {
    let (items, total) = db::list_articles(pool, &filter, pagination).await?;
    Ok((items, PageMeta::new(pagination, total)))
}

/// Get an article by id
///
/// Every successful read bumps `view_count` by one, atomically and with
/// no per-viewer dedup.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<ArticleWithAuthor, DomainError> {
    let mut found = db::find_article_with_author(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    db::increment_view_count(pool, id).await?;
    found.article.view_count += 1;

    Ok(found)
}

async fn find_owned_article(
    pool: &PgPool,
    id: Uuid,
    requester_id: Uuid,
) -> Result<Article, DomainError> {
    let article = db::find_article_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    if article.author_id != requester_id {
        return Err(DomainError::forbidden("only the author can modify this article"));
    }

    Ok(article)
}

/// Apply a partial update
///
/// Absent patch fields are untouched; explicit nulls clear nullable
/// fields. A draft-to-published transition sets `published_at` exactly
/// once.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: ArticlePatch,
    requester_id: Uuid,
) -> Result<ArticleWithAuthor, DomainError> {
    patch.validate()?;

    let mut article = find_owned_article(pool, id, requester_id).await?;
    patch.apply(&mut article);
    db::save_article(pool, &article).await?;

    db::find_article_with_author(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))
}

/// Soft-delete an article
///
/// Sets `is_deleted`; the status enum value stays as it was. The row is
/// excluded from all subsequent reads but never hard-deleted.
pub async fn remove(pool: &PgPool, id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
    find_owned_article(pool, id, requester_id).await?;
    db::mark_deleted(pool, id).await?;

    tracing::info!("Article soft-deleted: {}", id);
    Ok(())
}

/// Convenience draft-to-published transition
pub async fn publish(
    pool: &PgPool,
    id: Uuid,
    requester_id: Uuid,
) -> Result<ArticleWithAuthor, DomainError> {
    let mut article = find_owned_article(pool, id, requester_id).await?;

    if article.status == ArticleStatus::Published {
        return Err(DomainError::validation("status", "article is already published"));
    }

    article.status = ArticleStatus::Published;
    if article.published_at.is_none() {
        article.published_at = Some(Utc::now());
    }
    db::save_article(pool, &article).await?;

    tracing::info!("Article published: {}", id);

    db::find_article_with_author(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))
}

/// Toggle the caller's like on an article
///
/// Backed by the `article_likes` join table, so each user counts once.
/// The row flip and the counter adjustment commit together.
pub async fn toggle_like(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<LikeOutcome, DomainError> {
    db::find_article_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    let mut tx = pool.begin().await?;

    let outcome = if db::delete_like(&mut *tx, user_id, id).await? {
        let like_count = db::adjust_like_count(&mut *tx, id, -1).await?;
        LikeOutcome {
            liked: false,
            like_count,
        }
    } else {
        db::insert_like(&mut *tx, user_id, id).await?;
        let like_count = db::adjust_like_count(&mut *tx, id, 1).await?;
        LikeOutcome {
            liked: true,
            like_count,
        }
    };

    tx.commit().await?;
    Ok(outcome)
}

/// Toggle the caller's save on an article
pub async fn toggle_save(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<SaveOutcome, DomainError> {
    db::find_article_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    let saved = if db::delete_save(pool, user_id, id).await? {
        false
    } else {
        db::insert_save(pool, user_id, id).await?
    };

    Ok(SaveOutcome { saved })
}
