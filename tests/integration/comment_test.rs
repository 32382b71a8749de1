//! Comment threading, edit window, and counter round-trips

use serial_test::serial;

use inkpost::article::model::ArticleStatus;
use inkpost::article::service as articles;
use inkpost::comment::model::{CommentSortBy, CommentStatus, Provenance, SortOrder};
use inkpost::comment::service;
use inkpost::envelope::Pagination;
use inkpost::error::DomainError;

use crate::common::database::TestDatabase;
use crate::common::fixtures::{article_comment_count, create_article, create_comment, create_user};

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn create_and_delete_round_trip_counters() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer1").await;
    let reader = create_user(db.pool(), "reader1").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let top = create_comment(db.pool(), article_id, reader.id, None).await;
    assert_eq!(article_comment_count(db.pool(), article_id).await, 1);

    let reply = create_comment(db.pool(), article_id, author.id, Some(top.comment.id)).await;
    assert_eq!(article_comment_count(db.pool(), article_id).await, 2);

    let parent = service::get_by_id(db.pool(), top.comment.id).await.unwrap();
    assert_eq!(parent.comment.reply_count, 1);

    // Deleting the reply decrements both counters in one transaction
    service::remove(db.pool(), reply.comment.id, author.id)
        .await
        .unwrap();
    assert_eq!(article_comment_count(db.pool(), article_id).await, 1);

    let parent = service::get_by_id(db.pool(), top.comment.id).await.unwrap();
    assert_eq!(parent.comment.reply_count, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn deleting_twice_cannot_double_decrement() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer2").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let comment = create_comment(db.pool(), article_id, author.id, None).await;
    service::remove(db.pool(), comment.comment.id, author.id)
        .await
        .unwrap();
    assert_eq!(article_comment_count(db.pool(), article_id).await, 0);

    let err = service::remove(db.pool(), comment.comment.id, author.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    assert_eq!(article_comment_count(db.pool(), article_id).await, 0);

    // The tombstone row still resolves by id
    let tombstone = service::get_by_id(db.pool(), comment.comment.id)
        .await
        .unwrap();
    assert_eq!(tombstone.comment.status, CommentStatus::Deleted);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn concurrent_deletes_decrement_counters_once() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "racer").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let keeper = create_comment(db.pool(), article_id, author.id, None).await;
    let victim = create_comment(db.pool(), article_id, author.id, None).await;
    assert_eq!(article_comment_count(db.pool(), article_id).await, 2);

    let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let pool = db.pool().clone();
        let barrier = barrier.clone();
        let comment_id = victim.comment.id;
        let author_id = author.id;
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service::remove(&pool, comment_id, author_id).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // Exactly one delete wins; the loser must not decrement again
    assert_eq!(successes, 1);
    assert_eq!(article_comment_count(db.pool(), article_id).await, 1);

    let survivor = service::get_by_id(db.pool(), keeper.comment.id)
        .await
        .unwrap();
    assert_eq!(survivor.comment.status, CommentStatus::Published);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn replies_to_replies_are_rejected() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer3").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let top = create_comment(db.pool(), article_id, author.id, None).await;
    let reply = create_comment(db.pool(), article_id, author.id, Some(top.comment.id)).await;

    let err = service::create(
        db.pool(),
        "nested reply".to_string(),
        article_id,
        author.id,
        Some(reply.comment.id),
        Provenance::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn cannot_comment_on_deleted_article() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer4").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    articles::remove(db.pool(), article.article.id, author.id)
        .await
        .unwrap();

    let err = service::create(
        db.pool(),
        "too late".to_string(),
        article.article.id,
        author.id,
        None,
        Provenance::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn edit_window_closes_after_five_minutes() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer5").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let comment = create_comment(db.pool(), article.article.id, author.id, None).await;

    // Fresh comment edits fine
    let updated = service::update(
        db.pool(),
        comment.comment.id,
        "edited content".to_string(),
        author.id,
    )
    .await
    .unwrap();
    assert_eq!(updated.comment.content, "edited content");

    // Age the row past the window
    sqlx::query("UPDATE comments SET created_at = created_at - INTERVAL '6 minutes' WHERE id = $1")
        .bind(comment.comment.id)
        .execute(db.pool())
        .await
        .unwrap();

    let err = service::update(
        db.pool(),
        comment.comment.id,
        "too late".to_string(),
        author.id,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn hidden_comments_drop_out_of_listings_but_keep_replies_counted() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer6").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let visible = create_comment(db.pool(), article_id, author.id, None).await;
    let hidden = create_comment(db.pool(), article_id, author.id, None).await;

    sqlx::query("UPDATE comments SET status = 'hidden' WHERE id = $1")
        .bind(hidden.comment.id)
        .execute(db.pool())
        .await
        .unwrap();

    let (threads, meta) = service::list_by_article(
        db.pool(),
        article_id,
        Pagination::new(1, 10),
        CommentSortBy::default(),
        SortOrder::default(),
    )
    .await
    .unwrap();

    assert_eq!(meta.total, 1);
    assert_eq!(threads[0].comment.comment.id, visible.comment.id);

    // Hidden parents cannot take new replies
    let err = service::create(
        db.pool(),
        "reply to hidden".to_string(),
        article_id,
        author.id,
        Some(hidden.comment.id),
        Provenance::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn threaded_listing_attaches_replies_oldest_first() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer7").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let article_id = article.article.id;

    let top = create_comment(db.pool(), article_id, author.id, None).await;
    let first_reply = create_comment(db.pool(), article_id, author.id, Some(top.comment.id)).await;
    let second_reply =
        create_comment(db.pool(), article_id, author.id, Some(top.comment.id)).await;

    let (threads, _) = service::list_by_article(
        db.pool(),
        article_id,
        Pagination::new(1, 10),
        CommentSortBy::default(),
        SortOrder::default(),
    )
    .await
    .unwrap();

    assert_eq!(threads.len(), 1);
    let replies: Vec<_> = threads[0].replies.iter().map(|r| r.comment.id).collect();
    assert_eq!(replies, vec![first_reply.comment.id, second_reply.comment.id]);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn only_the_author_can_edit_or_delete() {
    let db = TestDatabase::new().await;
    let author = create_user(db.pool(), "writer8").await;
    let stranger = create_user(db.pool(), "stranger8").await;
    let article = create_article(db.pool(), author.id, ArticleStatus::Published).await;
    let comment = create_comment(db.pool(), article.article.id, author.id, None).await;

    let err = service::update(
        db.pool(),
        comment.comment.id,
        "hijacked".to_string(),
        stranger.id,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let err = service::remove(db.pool(), comment.comment.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
}
