/**
 * Article Domain Model
 *
 * The article record, its status enum, and the validated input types for
 * create/patch/list operations.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::auth::users::AuthorSummary;
use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 100;
pub const SUMMARY_MAX_LEN: usize = 500;
pub const MAX_CATEGORIES: usize = 5;
pub const MAX_TAGS: usize = 20;

/// Article lifecycle status
///
/// `Deleted` is kept for schema fidelity; visibility is governed solely by
/// the `is_deleted` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Deleted,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Article record as stored
#[derive(Debug, Clone)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    /// Markdown body
    pub content: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub status: ArticleStatus,
    pub view_count: i32,
    pub like_count: i32,
    /// Count of non-deleted comments, maintained incrementally
    pub comment_count: i32,
    pub category_ids: Vec<i32>,
    pub tag_ids: Option<Vec<i32>>,
    /// Authoritative visibility gate; rows with this set never appear in reads
    pub is_deleted: bool,
    /// Set exactly once, on the first draft-to-published transition
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article joined with its author's public projection
#[derive(Debug, Clone)]
pub struct ArticleWithAuthor {
    pub article: Article,
    pub author: AuthorSummary,
}

/// Validated input for article creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub status: ArticleStatus,
}

impl NewArticle {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        if let Some(summary) = &self.summary {
            validate_summary(summary)?;
        }
        validate_categories(&self.category_ids)?;
        if let Some(tags) = &self.tag_ids {
            validate_tags(tags)?;
        }
        if self.status == ArticleStatus::Deleted {
            return Err(DomainError::validation(
                "status",
                "articles cannot be created in the deleted state",
            ));
        }
        Ok(())
    }
}

/// Deserialize a field that distinguishes absent from explicit null
///
/// Used with `#[serde(default)]`: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(v))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update: absent fields are untouched, explicit null clears
/// nullable fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub category_ids: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tag_ids: Option<Option<Vec<i32>>>,
    pub status: Option<ArticleStatus>,
}

impl ArticlePatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(Some(summary)) = &self.summary {
            validate_summary(summary)?;
        }
        if let Some(categories) = &self.category_ids {
            validate_categories(categories)?;
        }
        if let Some(Some(tags)) = &self.tag_ids {
            validate_tags(tags)?;
        }
        Ok(())
    }

    /// Apply the present fields to an article, leaving absent ones untouched
    pub fn apply(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(summary) = &self.summary {
            article.summary = summary.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            article.cover_image = cover_image.clone();
        }
        if let Some(categories) = &self.category_ids {
            article.category_ids = categories.clone();
        }
        if let Some(tags) = &self.tag_ids {
            article.tag_ids = tags.clone();
        }
        if let Some(status) = self.status {
            // publishedAt is set exactly once, on the first transition
            // into the published state.
            if article.status == ArticleStatus::Draft
                && status == ArticleStatus::Published
                && article.published_at.is_none()
            {
                article.published_at = Some(Utc::now());
            }
            article.status = status;
        }
    }
}

/// Filters for article listing; all optional and combined with AND
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    /// Case-insensitive substring match on title OR content
    pub search: Option<String>,
    pub status: Option<ArticleStatus>,
    /// Membership test against `category_ids`
    pub category_id: Option<i32>,
    /// Membership test against `tag_ids`
    pub tag_id: Option<i32>,
    pub author_id: Option<Uuid>,
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.is_empty() {
        return Err(DomainError::validation("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(
            "title",
            format!("must be at most {TITLE_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.is_empty() {
        return Err(DomainError::validation("content", "must not be empty"));
    }
    Ok(())
}

fn validate_summary(summary: &str) -> Result<(), DomainError> {
    if summary.chars().count() > SUMMARY_MAX_LEN {
        return Err(DomainError::validation(
            "summary",
            format!("must be at most {SUMMARY_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_categories(categories: &[i32]) -> Result<(), DomainError> {
    if categories.len() > MAX_CATEGORIES {
        return Err(DomainError::validation(
            "categoryIds",
            format!("at most {MAX_CATEGORIES} categories"),
        ));
    }
    Ok(())
}

fn validate_tags(tags: &[i32]) -> Result<(), DomainError> {
    if tags.len() > MAX_TAGS {
        return Err(DomainError::validation(
            "tagIds",
            format!("at most {MAX_TAGS} tags"),
        ));
    }
    Ok(())
}
