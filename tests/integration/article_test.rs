//! Article lifecycle, visibility, and counter behavior

use serial_test::serial;

use inkpost::article::model::{ArticleFilter, ArticlePatch, ArticleStatus};
use inkpost::article::service;
use inkpost::envelope::Pagination;
use inkpost::error::DomainError;

use crate::common::database::TestDatabase;
use crate::common::fixtures::{create_article, create_user};

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn publish_sets_published_at_exactly_once() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author1").await;
    let draft = create_article(db.pool(), author.id, ArticleStatus::Draft).await;
    assert!(draft.article.published_at.is_none());

    let published = service::publish(db.pool(), draft.article.id, author.id)
        .await
        .unwrap();
    let first_published_at = published.article.published_at.unwrap();

    // Publishing again fails and the timestamp is untouched
    let err = service::publish(db.pool(), draft.article.id, author.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    // Unpublish back to draft, then publish again: original timestamp survives
    let patch = ArticlePatch {
        status: Some(ArticleStatus::Draft),
        ..Default::default()
    };
    service::update(db.pool(), draft.article.id, patch, author.id)
        .await
        .unwrap();

    let republished = service::publish(db.pool(), draft.article.id, author.id)
        .await
        .unwrap();
    assert_eq!(republished.article.published_at.unwrap(), first_published_at);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn soft_deleted_articles_disappear_from_reads() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author2").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;

    service::remove(db.pool(), article.article.id, author.id)
        .await
        .unwrap();

    let err = service::get_by_id(db.pool(), article.article.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let (items, meta) = service::list(
        db.pool(),
        ArticleFilter::default(),
        Pagination::new(1, 10),
    )
    .await
    .unwrap();
    assert!(items.is_empty());
    assert_eq!(meta.total, 0);

    // The row itself survives as a tombstone
    let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM articles WHERE id = $1")
        .bind(article.article.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert!(is_deleted);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn non_owner_cannot_mutate() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author3").await;
    let stranger = create_user(db.pool(), "stranger3").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Draft).await;

    let patch = ArticlePatch {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    let err = service::update(db.pool(), article.article.id, patch, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let err = service::remove(db.pool(), article.article.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn detail_reads_increment_view_count() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author4").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;

    let first = service::get_by_id(db.pool(), article.article.id)
        .await
        .unwrap();
    let second = service::get_by_id(db.pool(), article.article.id)
        .await
        .unwrap();

    assert_eq!(first.article.view_count, 1);
    assert_eq!(second.article.view_count, 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn like_toggle_is_deduplicated_per_user() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author5").await;
    let reader = create_user(db.pool(), "reader5").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;

    let liked = service::toggle_like(db.pool(), article.article.id, reader.id)
        .await
        .unwrap();
    assert!(liked.liked);
    assert_eq!(liked.like_count, 1);

    let unliked = service::toggle_like(db.pool(), article.article.id, reader.id)
        .await
        .unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn oversized_page_limit_is_clamped() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author7").await;
    create_article(db.pool(), author.id, ArticleStatus::Published).await;

    let (items, meta) = service::list(
        db.pool(),
        ArticleFilter::default(),
        Pagination::new(1, 500),
    )
    .await
    .unwrap();

    assert_eq!(meta.limit, 100);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn list_filters_by_status_and_author() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "author6").await;
    let other = create_user(db.pool(), "other6").await;
    create_article(db.pool(), author.id, ArticleStatus::Published).await;
    create_article(db.pool(), author.id, ArticleStatus::Draft).await;
    create_article(db.pool(), other.id, ArticleStatus::Published).await;

    let filter = ArticleFilter {
        status: Some(ArticleStatus::Published),
        author_id: Some(author.id),
        ..Default::default()
    };
    let (items, meta) = service::list(db.pool(), filter, Pagination::new(1, 10))
        .await
        .unwrap();

    assert_eq!(meta.total, 1);
    assert_eq!(items[0].article.author_id, author.id);
}
