/**
 * Comment Domain Model
 *
 * The comment record, its status machine, sort options, and the edit
 * window rule.
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::users::AuthorSummary;
use crate::error::DomainError;

pub const CONTENT_MAX_LEN: usize = 1000;

/// Authors may edit their comment this long after posting
pub const EDIT_WINDOW_MINUTES: i64 = 5;

/// Comment status machine
///
/// Pending and published are entry states (this system always enters at
/// published). Published and hidden flip back and forth under moderation;
/// deleted is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Published,
    Pending,
    Hidden,
    Deleted,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Pending => "pending",
            Self::Hidden => "hidden",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "pending" => Some(Self::Pending),
            "hidden" => Some(Self::Hidden),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Whether a comment in this state can receive replies
    pub fn can_be_replied(&self) -> bool {
        *self == Self::Published
    }

    /// Whether the machine allows moving from this state to `next`
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Published)
                | (Self::Published, Self::Hidden)
                | (Self::Hidden, Self::Published)
                | (Self::Published, Self::Deleted)
        )
    }
}

/// Comment record as stored
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub article_id: Uuid,
    pub author_id: Uuid,
    /// Present on replies; the parent is always a top-level comment
    pub parent_id: Option<Uuid>,
    pub status: CommentStatus,
    pub like_count: i32,
    /// Count of non-deleted direct children, maintained incrementally
    pub reply_count: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author's public projection
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: AuthorSummary,
}

/// A top-level comment with its published replies eagerly attached
#[derive(Debug)]
pub struct CommentThread {
    pub comment: CommentWithAuthor,
    pub replies: Vec<CommentWithAuthor>,
}

/// Request provenance recorded alongside a comment
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Top-level sort field for comment listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum CommentSortBy {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "likeCount")]
    LikeCount,
}

impl CommentSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::LikeCount => "like_count",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Whether a comment created at `created_at` is still editable at `now`
pub fn within_edit_window(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at <= Duration::minutes(EDIT_WINDOW_MINUTES)
}

/// Validate comment content length (1-1000 chars)
pub fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.is_empty() {
        return Err(DomainError::validation("content", "must not be empty"));
    }
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(DomainError::validation(
            "content",
            format!("must be at most {CONTENT_MAX_LEN} characters"),
        ));
    }
    Ok(())
}
