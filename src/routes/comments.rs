use crate::{
    error::Result,
    models::comment::*,
    state::AppState,
    utils::{
        access::parse_id,
        middleware::{AuthUser, JsonBody},
        pagination::{Pagination, PaginationQuery},
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// 获取帖子评论
/// GET /posts/:post_id/comments
pub async fn get_post_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CommentListResponse>> {
    let post_id = parse_id(&post_id, "post")?;
    let pagination = Pagination::from_query(&query, state.config.default_page_size);

    let page = state.comment_service.get_post_comments(post_id, pagination)?;
    Ok(Json(page.into()))
}

/// POST /posts/:post_id/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(request): JsonBody<CommentRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let post_id = parse_id(&post_id, "post")?;
    let comment = state
        .comment_service
        .create_comment(post_id, user.id, request)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "comment_id": comment.comment_id,
            "message": "Comment created"
        })),
    ))
}

/// PUT /comments/:comment_id
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
    JsonBody(request): JsonBody<CommentRequest>,
) -> Result<Json<Comment>> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let comment = state
        .comment_service
        .update_comment(comment_id, user.id, request)?;
    Ok(Json(comment))
}

/// DELETE /comments/:comment_id
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
) -> Result<Json<Value>> {
    let comment_id = parse_id(&comment_id, "comment")?;
    state.comment_service.delete_comment(comment_id, user.id)?;

    Ok(Json(json!({
        "message": "Comment soft deleted"
    })))
}
