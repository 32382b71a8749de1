/**
 * Comment Operations
 *
 * The comment aggregate's domain operations. Creation and deletion touch
 * two or three rows (the comment, the article's comment counter, and
 * optionally the parent's reply counter); those writes always share one
 * transaction so the counters can never drift from the rows they count.
 */

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::article;
use crate::auth::users;
use crate::comment::db;
use crate::comment::model::{
    self, CommentSortBy, CommentStatus, CommentThread, CommentWithAuthor, Provenance, SortOrder,
    within_edit_window,
};
use crate::envelope::{PageMeta, Pagination};
use crate::error::DomainError;

/// Create a comment or reply
///
/// The article must exist and not be soft-deleted; a reply's parent must
/// be a published, top-level comment on the same article. The insert and
/// both counter increments commit atomically.
pub async fn create(
    pool: &PgPool,
    content: String,
    article_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    provenance: Provenance,
) -> Result<CommentWithAuthor, DomainError> {
    model::validate_content(&content)?;

    let mut tx = pool.begin().await?;

    article::db::find_article_by_id(&mut *tx, article_id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    users::find_user_by_id(&mut *tx, author_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user not found"))?;

    if let Some(parent_id) = parent_id {
        db::find_eligible_parent(&mut *tx, parent_id, article_id)
            .await?
            .ok_or_else(|| DomainError::not_found("parent comment not found or not eligible"))?;
    }

    let comment = db::insert_comment(
        &mut *tx,
        &content,
        article_id,
        author_id,
        parent_id,
        &provenance,
    )
    .await?;

    article::db::adjust_comment_count(&mut *tx, article_id, 1).await?;
    if let Some(parent_id) = parent_id {
        db::adjust_reply_count(&mut *tx, parent_id, 1).await?;
    }

    tx.commit().await?;

    tracing::info!("Comment created: {} on article {}", comment.id, article_id);

    db::find_comment_with_author(pool, comment.id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))
}

/// Top-level published comments for an article, replies eagerly attached
///
/// Replies are always ordered oldest-first; the top-level order follows
/// the requested sort.
pub async fn list_by_article(
    pool: &PgPool,
    article_id: Uuid,
    pagination: Pagination,
    sort_by: CommentSortBy,
    order: SortOrder,
) -> Result<(Vec<CommentThread>, PageMeta), DomainError> {
    article::db::find_article_by_id(pool, article_id)
        .await?
        .ok_or_else(|| DomainError::not_found("article not found"))?;

    let (top_level, total) = db::list_top_level(pool, article_id, pagination, sort_by, order).await?;

    let parent_ids: Vec<Uuid> = top_level.iter().map(|c| c.comment.id).collect();
    let mut replies = if parent_ids.is_empty() {
        Vec::new()
    } else {
        db::replies_for_parents(pool, &parent_ids).await?
    };

    let threads = top_level
        .into_iter()
        .map(|comment| {
            let id = comment.comment.id;
            // replies are ordered by created_at ASC; extract preserves it
            let (mine, rest): (Vec<_>, Vec<_>) = replies
                .drain(..)
                .partition(|r| r.comment.parent_id == Some(id));
            replies = rest;
            CommentThread {
                comment,
                replies: mine,
            }
        })
        .collect();

    Ok((threads, PageMeta::new(pagination, total)))
}

/// Published direct replies of one comment
pub async fn list_replies(
    pool: &PgPool,
    comment_id: Uuid,
    pagination: Pagination,
    sort_by: CommentSortBy,
    order: SortOrder,
) -> Result<(Vec<CommentWithAuthor>, PageMeta), DomainError> {
    let parent = db::find_comment_by_id(pool, comment_id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))?;

    if parent.status != CommentStatus::Published {
        return Err(DomainError::not_found("comment not found"));
    }

    let (items, total) = db::list_replies(pool, comment_id, pagination, sort_by, order).await?;
    Ok((items, PageMeta::new(pagination, total)))
}

/// One user's published comments, newest first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    pagination: Pagination,
) -> Result<(Vec<CommentWithAuthor>, PageMeta), DomainError> {
    let (items, total) = db::list_by_author(pool, author_id, pagination).await?;
    Ok((items, PageMeta::new(pagination, total)))
}

/// Get a comment by id
///
/// Tombstoned comments still resolve here; visibility decisions belong
/// to the caller.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<CommentWithAuthor, DomainError> {
    db::find_comment_with_author(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))
}

/// Replace a comment's content
///
/// Only the author may edit, only while the comment is still published,
/// and only within five minutes of posting. Each violation is a distinct
/// typed error, never silently ignored.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    content: String,
    requester_id: Uuid,
) -> Result<CommentWithAuthor, DomainError> {
    let comment = db::find_comment_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))?;

    if comment.author_id != requester_id {
        return Err(DomainError::forbidden("only the author can edit this comment"));
    }

    if comment.status != CommentStatus::Published {
        return Err(DomainError::validation(
            "status",
            "only published comments can be edited",
        ));
    }

    if !within_edit_window(comment.created_at, Utc::now()) {
        return Err(DomainError::validation(
            "createdAt",
            "comments can only be edited within 5 minutes of posting",
        ));
    }

    model::validate_content(&content)?;
    db::update_content(pool, id, &content).await?;

    db::find_comment_with_author(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))
}

/// Soft-delete a comment
///
/// The tombstone stays in place and its children remain retrievable by
/// id. The status flip and both counter decrements commit atomically.
/// An already-deleted comment reports NotFound so the counters cannot be
/// decremented twice.
pub async fn remove(pool: &PgPool, id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;

    let comment = db::find_comment_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))?;

    if comment.author_id != requester_id {
        return Err(DomainError::forbidden("only the author can delete this comment"));
    }

    if !comment.status.can_transition_to(CommentStatus::Deleted) {
        return Err(DomainError::not_found("comment not found"));
    }

    // The flip is conditional on the row still being published, so a
    // concurrent delete that already won leaves zero rows affected here
    // and the counters untouched.
    if !db::tombstone_comment(&mut *tx, id).await? {
        return Err(DomainError::not_found("comment not found"));
    }

    article::db::adjust_comment_count(&mut *tx, comment.article_id, -1).await?;
    if let Some(parent_id) = comment.parent_id {
        db::adjust_reply_count(&mut *tx, parent_id, -1).await?;
    }

    tx.commit().await?;

    tracing::info!("Comment soft-deleted: {}", id);
    Ok(())
}

/// Like a published comment
pub async fn like(pool: &PgPool, id: Uuid) -> Result<i32, DomainError> {
    db::adjust_like_count(pool, id, 1)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))
}

/// Remove a like from a published comment; the counter floors at zero
pub async fn unlike(pool: &PgPool, id: Uuid) -> Result<i32, DomainError> {
    db::adjust_like_count(pool, id, -1)
        .await?
        .ok_or_else(|| DomainError::not_found("comment not found"))
}
