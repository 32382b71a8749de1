/**
 * Comment Handlers
 *
 * HTTP handlers and wire DTOs for the comment routes. Request provenance
 * (client address, user agent) is captured from headers here and handed
 * to the domain layer as data.
 */

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::users::AuthorSummary;
use crate::comment::model::{
    CommentSortBy, CommentStatus, CommentThread, CommentWithAuthor, Provenance, SortOrder,
};
use crate::comment::service;
use crate::envelope::{ApiResponse, Page, PageQuery};
use crate::error::DomainError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Comment creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub article_id: Uuid,
    pub parent_id: Option<Uuid>,
}

/// Comment edit request
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Query parameters for comment listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: CommentSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Comment projection with author, optionally carrying its replies
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub article_id: String,
    pub parent_id: Option<String>,
    pub status: CommentStatus,
    pub like_count: i32,
    pub reply_count: i32,
    pub created_at: String,
    pub updated_at: String,
    pub author: AuthorSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentResponse>>,
}

/// New like counter value after like/unlike
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountResponse {
    pub like_count: i32,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(found: CommentWithAuthor) -> Self {
        let comment = found.comment;
        Self {
            id: comment.id.to_string(),
            content: comment.content,
            article_id: comment.article_id.to_string(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            status: comment.status,
            like_count: comment.like_count,
            reply_count: comment.reply_count,
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
            author: found.author,
            replies: None,
        }
    }
}

impl From<CommentThread> for CommentResponse {
    fn from(thread: CommentThread) -> Self {
        let mut response: CommentResponse = thread.comment.into();
        response.replies = Some(thread.replies.into_iter().map(Into::into).collect());
        response
    }
}

fn provenance_from_headers(headers: &HeaderMap) -> Provenance {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|v| v.to_string());

    Provenance {
        ip_address,
        user_agent,
    }
}

/// POST /api/comments
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    headers: HeaderMap,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, DomainError> {
    let provenance = provenance_from_headers(&headers);

    let comment = service::create(
        &state.pool,
        request.content,
        request.article_id,
        user.id,
        request.parent_id,
        provenance,
    )
    .await?;

    Ok(Json(ApiResponse::ok(comment.into())))
}

/// GET /api/comments/article/{articleId}
pub async fn list_by_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<Page<CommentResponse>>>, DomainError> {
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize(DEFAULT_PAGE_LIMIT);

    let (threads, meta) = service::list_by_article(
        &state.pool,
        article_id,
        pagination,
        query.sort_by,
        query.sort_order,
    )
    .await?;

    Ok(Json(ApiResponse::ok(Page {
        list: threads.into_iter().map(Into::into).collect(),
        meta,
    })))
}

/// GET /api/comments/{id}/replies
pub async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<Page<CommentResponse>>>, DomainError> {
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize(DEFAULT_PAGE_LIMIT);

    let (items, meta) =
        service::list_replies(&state.pool, id, pagination, query.sort_by, query.sort_order)
            .await?;

    Ok(Json(ApiResponse::ok(Page {
        list: items.into_iter().map(Into::into).collect(),
        meta,
    })))
}

/// GET /api/comments/user/{userId}
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<Page<CommentResponse>>>, DomainError> {
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize(DEFAULT_PAGE_LIMIT);

    let (items, meta) = service::list_by_author(&state.pool, user_id, pagination).await?;

    Ok(Json(ApiResponse::ok(Page {
        list: items.into_iter().map(Into::into).collect(),
        meta,
    })))
}

/// GET /api/comments/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CommentResponse>>, DomainError> {
    let comment = service::get_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(comment.into())))
}

/// PUT /api/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, DomainError> {
    let comment = service::update(&state.pool, id, request.content, user.id).await?;
    Ok(Json(ApiResponse::ok(comment.into())))
}

/// DELETE /api/comments/{id}
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<()>>>, DomainError> {
    service::remove(&state.pool, id, user.id).await?;
    Ok(Json(ApiResponse::ok(None)))
}

/// POST /api/comments/{id}/like
pub async fn like(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeCountResponse>>, DomainError> {
    let like_count = service::like(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(LikeCountResponse { like_count })))
}

/// DELETE /api/comments/{id}/like
pub async fn unlike(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeCountResponse>>, DomainError> {
    let like_count = service::unlike(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(LikeCountResponse { like_count })))
}
