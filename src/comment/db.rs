/**
 * Database Operations for Comments
 *
 * Raw SQL against the comments table. Status filtering happens here;
 * counter columns are only changed with atomic SQL increments. The
 * mutation functions take any executor so the service layer can run them
 * inside one transaction together with the article counter contract.
 */

use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::users::AuthorSummary;
use crate::comment::model::{
    Comment, CommentSortBy, CommentStatus, CommentWithAuthor, Provenance, SortOrder,
};
use crate::envelope::Pagination;

const COMMENT_COLUMNS: &str = "c.id, c.content, c.article_id, c.author_id, c.parent_id, c.status, c.like_count, c.reply_count, c.ip_address, c.user_agent, c.created_at, c.updated_at";

const AUTHOR_COLUMNS: &str =
    "u.username AS author_username, u.avatar AS author_avatar, u.bio AS author_bio";

fn map_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        article_id: row.get("article_id"),
        author_id: row.get("author_id"),
        parent_id: row.get("parent_id"),
        status: CommentStatus::from_str(row.get::<String, _>("status").as_str())
            .unwrap_or(CommentStatus::Pending),
        like_count: row.get("like_count"),
        reply_count: row.get("reply_count"),
        ip_address: row.get("ip_address"),
        user_agent: row.get("user_agent"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_with_author(row: &PgRow) -> CommentWithAuthor {
    let comment = map_comment(row);
    let author = AuthorSummary {
        id: comment.author_id,
        username: row.get("author_username"),
        avatar: row.get("author_avatar"),
        bio: row.get("author_bio"),
    };
    CommentWithAuthor { comment, author }
}

/// Insert a comment; always enters in the published state
pub async fn insert_comment(
    executor: impl PgExecutor<'_>,
    content: &str,
    article_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    provenance: &Provenance,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();

    let row = sqlx::query(
        r#"
        INSERT INTO comments (id, content, article_id, author_id, parent_id, status, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5, 'published', $6, $7)
        RETURNING id, content, article_id, author_id, parent_id, status, like_count, reply_count, ip_address, user_agent, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(article_id)
    .bind(author_id)
    .bind(parent_id)
    .bind(&provenance.ip_address)
    .bind(&provenance.user_agent)
    .fetch_one(executor)
    .await?;

    Ok(map_comment(&row))
}

/// Get a comment by id, tombstones included
pub async fn find_comment_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_comment))
}

/// Get a comment joined with its author, tombstones included
pub async fn find_comment_with_author(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<CommentWithAuthor>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}, {AUTHOR_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_with_author))
}

/// Find a parent eligible to receive a reply
///
/// The parent must belong to the same article, be top-level, and be
/// published. Hidden, pending, and deleted parents are not eligible.
pub async fn find_eligible_parent(
    executor: impl PgExecutor<'_>,
    parent_id: Uuid,
    article_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS} FROM comments c
        WHERE c.id = $1 AND c.article_id = $2 AND c.status = 'published' AND c.parent_id IS NULL
        "#
    ))
    .bind(parent_id)
    .bind(article_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_comment))
}

/// Page of top-level published comments for an article
pub async fn list_top_level(
    pool: &PgPool,
    article_id: Uuid,
    pagination: Pagination,
    sort_by: CommentSortBy,
    order: SortOrder,
) -> Result<(Vec<CommentWithAuthor>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE article_id = $1 AND status = 'published' AND parent_id IS NULL",
    )
    .bind(article_id)
    .fetch_one(pool)
    .await?;

    // sort column/direction come from closed enums, never from raw input
    let rows = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}, {AUTHOR_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.article_id = $1 AND c.status = 'published' AND c.parent_id IS NULL
        ORDER BY c.{} {}
        LIMIT $2 OFFSET $3
        "#,
        sort_by.column(),
        order.sql(),
    ))
    .bind(article_id)
    .bind(i64::from(pagination.limit))
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows.iter().map(map_with_author).collect(), total))
}

/// Published replies for a set of parents, oldest first
///
/// Used to eagerly attach reply lists to a page of top-level comments.
pub async fn replies_for_parents(
    pool: &PgPool,
    parent_ids: &[Uuid],
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}, {AUTHOR_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.parent_id = ANY($1) AND c.status = 'published'
        ORDER BY c.created_at ASC
        "#
    ))
    .bind(parent_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_with_author).collect())
}

/// Page of published direct children of one comment
pub async fn list_replies(
    pool: &PgPool,
    parent_id: Uuid,
    pagination: Pagination,
    sort_by: CommentSortBy,
    order: SortOrder,
) -> Result<(Vec<CommentWithAuthor>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE parent_id = $1 AND status = 'published'",
    )
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}, {AUTHOR_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.parent_id = $1 AND c.status = 'published'
        ORDER BY c.{} {}
        LIMIT $2 OFFSET $3
        "#,
        sort_by.column(),
        order.sql(),
    ))
    .bind(parent_id)
    .bind(i64::from(pagination.limit))
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows.iter().map(map_with_author).collect(), total))
}

/// Page of one user's published comments, newest first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    pagination: Pagination,
) -> Result<(Vec<CommentWithAuthor>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE author_id = $1 AND status = 'published'",
    )
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}, {AUTHOR_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.author_id = $1 AND c.status = 'published'
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(author_id)
    .bind(i64::from(pagination.limit))
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows.iter().map(map_with_author).collect(), total))
}

/// Replace a comment's content
pub async fn update_content(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(content)
        .execute(executor)
        .await?;

    Ok(())
}

/// Flip a published comment to its deleted tombstone
///
/// The status check is part of the UPDATE itself, so of two concurrent
/// deletes only one can flip the row; the loser sees zero rows affected
/// and must not touch the counters.
pub async fn tombstone_comment(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE comments SET status = 'deleted', updated_at = NOW() WHERE id = $1 AND status = 'published'",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Atomically adjust a parent's reply counter with a floor of zero
pub async fn adjust_reply_count(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET reply_count = GREATEST(reply_count + $2, 0) WHERE id = $1")
        .bind(id)
        .bind(delta)
        .execute(executor)
        .await?;

    Ok(())
}

/// Atomically adjust the like counter of a published comment
///
/// Floors at zero; returns the new count, or None when the comment is
/// absent or not published.
pub async fn adjust_like_count(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    delta: i32,
) -> Result<Option<i32>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE comments SET like_count = GREATEST(like_count + $2, 0)
        WHERE id = $1 AND status = 'published'
        RETURNING like_count
        "#,
    )
    .bind(id)
    .bind(delta)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.get("like_count")))
}
