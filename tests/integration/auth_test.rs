//! Registration, login, and session verification against the store

use serial_test::serial;

use inkpost::auth::service::{authenticate, register, verify_claim, Registration};
use inkpost::auth::TokenIssuer;
use inkpost::error::DomainError;

use crate::common::database::TestDatabase;
use crate::common::fixtures::create_user;

fn registration(username: &str, email: &str) -> Registration {
    Registration {
        username: username.to_string(),
        nickname: None,
        email: email.to_string(),
        password: "hunter2hunter2".to_string(),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn register_then_login_roundtrip() {
    let db = TestDatabase::new().await;
    let tokens = TokenIssuer::new("integration-secret");

    let user = register(db.pool(), registration("alice", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(user.username, "alice");

    let (logged_in, token) =
        authenticate(db.pool(), &tokens, "alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
    assert_eq!(logged_in.id, user.id);

    let verified = verify_claim(db.pool(), &tokens, &token).await.unwrap();
    assert_eq!(verified.id, user.id);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;

    register(db.pool(), registration("bob", "bob@example.com"))
        .await
        .unwrap();

    let err = register(db.pool(), registration("bob2", "bob@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn duplicate_username_is_conflict() {
    let db = TestDatabase::new().await;

    register(db.pool(), registration("carol", "carol@example.com"))
        .await
        .unwrap();

    let err = register(db.pool(), registration("carol", "carol2@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn constraint_violation_maps_to_conflict() {
    let db = TestDatabase::new().await;
    create_user(db.pool(), "frank").await;

    // Insert directly, skipping the pre-insert lookups, the way a racing
    // registration would reach the unique constraint
    let err = inkpost::auth::users::create_user(
        db.pool(),
        "frank2",
        None,
        "frank@example.com",
        "not-a-real-hash",
    )
    .await
    .unwrap_err();

    let mapped = inkpost::auth::service::conflict_on_unique_violation(err);
    assert!(matches!(mapped, DomainError::Conflict { .. }));
    assert!(mapped.message().contains("email"));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn bad_credentials_are_indistinguishable() {
    let db = TestDatabase::new().await;
    let tokens = TokenIssuer::new("integration-secret");

    create_user(db.pool(), "dave").await;

    let unknown = authenticate(db.pool(), &tokens, "nobody@example.com", "whatever-pw")
        .await
        .unwrap_err();
    let wrong_pw = authenticate(db.pool(), &tokens, "dave@example.com", "wrong-password")
        .await
        .unwrap_err();

    // Same category and same message for unknown email and wrong password
    assert!(matches!(unknown, DomainError::Unauthorized { .. }));
    assert!(matches!(wrong_pw, DomainError::Unauthorized { .. }));
    assert_eq!(unknown.message(), wrong_pw.message());
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL"]
async fn token_for_deactivated_user_is_rejected() {
    let db = TestDatabase::new().await;
    let tokens = TokenIssuer::new("integration-secret");

    let user = create_user(db.pool(), "erin").await;
    let (_, token) = authenticate(db.pool(), &tokens, "erin@example.com", "hunter2hunter2")
        .await
        .unwrap();

    sqlx::query("UPDATE users SET status = 'inactive' WHERE id = $1")
        .bind(user.id)
        .execute(db.pool())
        .await
        .unwrap();

    let err = verify_claim(db.pool(), &tokens, &token).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized { .. }));
}
