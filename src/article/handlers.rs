/**
 * Article Handlers
 *
 * HTTP handlers and wire DTOs for the article routes. List/create return
 * the summary projection; getById returns the full detail including the
 * markdown body.
 */

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::article::model::{ArticleFilter, ArticlePatch, ArticleStatus, ArticleWithAuthor, NewArticle};
use crate::article::service::{self, LikeOutcome, SaveOutcome};
use crate::auth::users::AuthorSummary;
use crate::envelope::{ApiResponse, Page, PageQuery};
use crate::error::DomainError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Query parameters for article listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<ArticleStatus>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub author_id: Option<Uuid>,
}

/// Summary projection used by list and create responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryResponse {
    pub id: String,
    pub title: String,
    pub status: ArticleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: String,
    pub author: AuthorSummary,
}

/// Full projection returned by getById
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub category_ids: Vec<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub author: AuthorSummary,
}

impl From<ArticleWithAuthor> for ArticleSummaryResponse {
    fn from(found: ArticleWithAuthor) -> Self {
        let article = found.article;
        Self {
            id: article.id.to_string(),
            title: article.title,
            status: article.status,
            summary: article.summary,
            cover_image: article.cover_image,
            view_count: article.view_count,
            like_count: article.like_count,
            comment_count: article.comment_count,
            created_at: article.created_at.to_rfc3339(),
            author: found.author,
        }
    }
}

impl From<ArticleWithAuthor> for ArticleDetailResponse {
    fn from(found: ArticleWithAuthor) -> Self {
        let article = found.article;
        Self {
            id: article.id.to_string(),
            title: article.title,
            content: article.content,
            status: article.status,
            summary: article.summary,
            cover_image: article.cover_image,
            view_count: article.view_count,
            like_count: article.like_count,
            comment_count: article.comment_count,
            category_ids: article.category_ids,
            tag_ids: article.tag_ids,
            published_at: article.published_at.map(|t| t.to_rfc3339()),
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            author: found.author,
        }
    }
}

/// POST /api/articles
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(data): Json<NewArticle>,
) -> Result<Json<ApiResponse<ArticleSummaryResponse>>, DomainError> {
    let created = service::create(&state.pool, user.id, data).await?;
    Ok(Json(ApiResponse::ok(created.into())))
}

/// GET /api/articles
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<ApiResponse<Page<ArticleSummaryResponse>>>, DomainError> {
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize(DEFAULT_PAGE_LIMIT);

    let filter = ArticleFilter {
        search: query.search,
        status: query.status,
        category_id: query.category_id,
        tag_id: query.tag_id,
        author_id: query.author_id,
    };

    let (items, meta) = service::list(&state.pool, filter, pagination).await?;

    Ok(Json(ApiResponse::ok(Page {
        list: items.into_iter().map(Into::into).collect(),
        meta,
    })))
}

/// GET /api/articles/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ArticleDetailResponse>>, DomainError> {
    let found = service::get_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(found.into())))
}

/// PUT /api/articles/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<ApiResponse<ArticleDetailResponse>>, DomainError> {
    let updated = service::update(&state.pool, id, patch, user.id).await?;
    Ok(Json(ApiResponse::ok(updated.into())))
}

/// DELETE /api/articles/{id}
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<()>>>, DomainError> {
    service::remove(&state.pool, id, user.id).await?;
    Ok(Json(ApiResponse::ok(None)))
}

/// POST /api/articles/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ArticleDetailResponse>>, DomainError> {
    let published = service::publish(&state.pool, id, user.id).await?;
    Ok(Json(ApiResponse::ok(published.into())))
}

/// POST /api/articles/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeOutcome>>, DomainError> {
    let outcome = service::toggle_like(&state.pool, id, user.id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/articles/{id}/save
pub async fn toggle_save(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaveOutcome>>, DomainError> {
    let outcome = service::toggle_save(&state.pool, id, user.id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
