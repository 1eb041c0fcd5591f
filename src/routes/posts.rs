use crate::{
    error::Result,
    models::post::*,
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
use tracing::debug;

/// 获取单个帖子
/// GET /posts/:post_id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>> {
    let post_id = parse_id(&post_id, "post")?;
    let post = state.post_service.get_post(post_id)?;
    Ok(Json(post))
}

/// 获取用户的帖子
/// GET /users/:user_id/posts
pub async fn get_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<PostListResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let pagination = Pagination::from_query(&query, state.config.default_page_size);

    let page = state.post_service.get_user_posts(user_id, pagination);
    Ok(Json(page.into()))
}

/// GET /me/posts
pub async fn get_own_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<PostListResponse>> {
    let pagination = Pagination::from_query(&query, state.config.default_page_size);

    let page = state.post_service.get_user_posts(user.id, pagination);
    Ok(Json(page.into()))
}

/// 创建帖子
/// POST /posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    debug!("User {} creating post", user.id);

    let post = state.post_service.create_post(user.id, request)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "post_id": post.post_id,
            "message": "Post created",
            "post": post
        })),
    ))
}

/// 更新帖子
/// PATCH /posts/:post_id
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(request): JsonBody<UpdatePostRequest>,
) -> Result<Json<Post>> {
    let post_id = parse_id(&post_id, "post")?;
    let post = state.post_service.update_post(post_id, user.id, request)?;
    Ok(Json(post))
}

/// 删除帖子（软删除）
/// DELETE /posts/:post_id
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let post_id = parse_id(&post_id, "post")?;
    state.post_service.delete_post(post_id, user.id)?;

    Ok(Json(json!({
        "message": "Post soft deleted"
    })))
}
