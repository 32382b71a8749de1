/**
 * Comment Aggregate
 *
 * Threaded comments, one nesting level deep. Creation and deletion adjust
 * the owning article's comment counter (and the parent's reply counter)
 * inside a single transaction, always through the article aggregate's
 * counter contract.
 */

pub mod db;
pub mod handlers;
pub mod model;
pub mod service;

pub use model::{Comment, CommentSortBy, CommentStatus, CommentWithAuthor, Provenance, SortOrder};
