//! Integration tests against a real PostgreSQL database
//!
//! All tests here are ignored by default; run them with
//! `cargo test -- --ignored` once TEST_DATABASE_URL points at a
//! disposable database.

pub mod article_test;
pub mod auth_test;
pub mod comment_test;
