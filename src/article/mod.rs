/**
 * Article Aggregate
 *
 * Owns the article lifecycle (draft/published/soft-deleted), visibility
 * rules, ownership checks, and the derived counters. The comment
 * aggregate adjusts `comment_count` exclusively through
 * [`db::adjust_comment_count`]; nothing bypasses that contract.
 */

pub mod db;
pub mod handlers;
pub mod model;
pub mod service;

pub use model::{Article, ArticleFilter, ArticlePatch, ArticleStatus, ArticleWithAuthor, NewArticle};
