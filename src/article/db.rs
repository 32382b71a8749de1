/**
 * Database Operations for Articles
 *
 * Raw SQL against the articles table. Every read filters on
 * `is_deleted = FALSE`; counter columns are only ever changed with
 * atomic SQL increments so concurrent requests cannot lose updates.
 */

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::article::model::{Article, ArticleFilter, ArticleStatus, ArticleWithAuthor, NewArticle};
use crate::auth::users::AuthorSummary;
use crate::envelope::Pagination;

const ARTICLE_COLUMNS: &str = "a.id, a.title, a.content, a.summary, a.cover_image, a.author_id, a.status, a.view_count, a.like_count, a.comment_count, a.category_ids, a.tag_ids, a.is_deleted, a.published_at, a.created_at, a.updated_at";

const AUTHOR_COLUMNS: &str =
    "u.username AS author_username, u.avatar AS author_avatar, u.bio AS author_bio";

fn map_article(row: &PgRow) -> Article {
    Article {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        summary: row.get("summary"),
        cover_image: row.get("cover_image"),
        author_id: row.get("author_id"),
        status: ArticleStatus::from_str(row.get::<String, _>("status").as_str())
            .unwrap_or(ArticleStatus::Draft),
        view_count: row.get("view_count"),
        like_count: row.get("like_count"),
        comment_count: row.get("comment_count"),
        category_ids: row.get("category_ids"),
        tag_ids: row.get("tag_ids"),
        is_deleted: row.get("is_deleted"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_with_author(row: &PgRow) -> ArticleWithAuthor {
    let article = map_article(row);
    let author = AuthorSummary {
        id: article.author_id,
        username: row.get("author_username"),
        avatar: row.get("author_avatar"),
        bio: row.get("author_bio"),
    };
    ArticleWithAuthor { article, author }
}

/// Insert a new article row
pub async fn insert_article(
    executor: impl PgExecutor<'_>,
    author_id: Uuid,
    data: &NewArticle,
    published_at: Option<DateTime<Utc>>,
) -> Result<Article, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO articles (id, title, content, summary, cover_image, author_id, status, category_ids, tag_ids, published_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING id, title, content, summary, cover_image, author_id, status, view_count, like_count, comment_count, category_ids, tag_ids, is_deleted, published_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.content)
    .bind(&data.summary)
    .bind(&data.cover_image)
    .bind(author_id)
    .bind(data.status.as_str())
    .bind(&data.category_ids)
    .bind(&data.tag_ids)
    .bind(published_at)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(map_article(&row))
}

/// Get a non-deleted article by id
pub async fn find_article_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<Article>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.id = $1 AND a.is_deleted = FALSE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_article))
}

/// Get a non-deleted article joined with its author
pub async fn find_article_with_author(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<ArticleWithAuthor>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {ARTICLE_COLUMNS}, {AUTHOR_COLUMNS}
        FROM articles a
        JOIN users u ON u.id = a.author_id
        WHERE a.id = $1 AND a.is_deleted = FALSE
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_with_author))
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ArticleFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (a.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR a.content ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND a.status = ");
        qb.push_bind(status.as_str());
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND ");
        qb.push_bind(category_id);
        qb.push(" = ANY(a.category_ids)");
    }
    if let Some(tag_id) = filter.tag_id {
        qb.push(" AND ");
        qb.push_bind(tag_id);
        qb.push(" = ANY(a.tag_ids)");
    }
    if let Some(author_id) = filter.author_id {
        qb.push(" AND a.author_id = ");
        qb.push_bind(author_id);
    }
}

/// List non-deleted articles matching the filter, newest first
///
/// Returns the requested page and the total match count.
pub async fn list_articles(
    pool: &PgPool,
    filter: &ArticleFilter,
    pagination: Pagination,
) -> Result<(Vec<ArticleWithAuthor>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM articles a WHERE a.is_deleted = FALSE",
    );
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        r#"
        SELECT {ARTICLE_COLUMNS}, {AUTHOR_COLUMNS}
        FROM articles a
        JOIN users u ON u.id = a.author_id
        WHERE a.is_deleted = FALSE
        "#
    ));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY a.created_at DESC LIMIT ");
    qb.push_bind(i64::from(pagination.limit));
    qb.push(" OFFSET ");
    qb.push_bind(pagination.offset());

    let rows = qb.build().fetch_all(pool).await?;

    Ok((rows.iter().map(map_with_author).collect(), total))
}

/// Write back every owner-mutable field of an article
///
/// Counters are deliberately not part of this statement; they are only
/// changed through the atomic adjust/increment functions below.
pub async fn save_article(
    executor: impl PgExecutor<'_>,
    article: &Article,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE articles
        SET title = $1, content = $2, summary = $3, cover_image = $4,
            category_ids = $5, tag_ids = $6, status = $7, published_at = $8,
            updated_at = NOW()
        WHERE id = $9
        "#,
    )
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.summary)
    .bind(&article.cover_image)
    .bind(&article.category_ids)
    .bind(&article.tag_ids)
    .bind(article.status.as_str())
    .bind(article.published_at)
    .bind(article.id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Soft-delete an article; the status enum is left untouched
pub async fn mark_deleted(executor: impl PgExecutor<'_>, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE articles SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Atomically bump the view counter
pub async fn increment_view_count(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Counter contract used by the comment aggregate
///
/// Atomically adjusts `comment_count` by `delta` (±1) with a floor of
/// zero. Callable on any executor so comment mutations can include it in
/// their own transaction.
pub async fn adjust_comment_count(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE articles SET comment_count = GREATEST(comment_count + $2, 0) WHERE id = $1")
        .bind(id)
        .bind(delta)
        .execute(executor)
        .await?;

    Ok(())
}

/// Atomically adjust the like counter, returning the new value
pub async fn adjust_like_count(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    delta: i32,
) -> Result<i32, sqlx::Error> {
    let row = sqlx::query(
        "UPDATE articles SET like_count = GREATEST(like_count + $2, 0) WHERE id = $1 RETURNING like_count",
    )
    .bind(id)
    .bind(delta)
    .fetch_one(executor)
    .await?;

    Ok(row.get("like_count"))
}

/// Record a per-user like; returns false when it already existed
pub async fn insert_like(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO article_likes (user_id, article_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(article_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a per-user like; returns false when none existed
pub async fn delete_like(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM article_likes WHERE user_id = $1 AND article_id = $2")
        .bind(user_id)
        .bind(article_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record a per-user save; returns false when it already existed
pub async fn insert_save(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO article_saves (user_id, article_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(article_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a per-user save; returns false when none existed
pub async fn delete_save(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM article_saves WHERE user_id = $1 AND article_id = $2")
        .bind(user_id)
        .bind(article_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
