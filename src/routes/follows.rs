use crate::{
    error::Result,
    models::{follow::*, response::MessageResponse},
    state::AppState,
    utils::{
        access::parse_id,
        middleware::AuthUser,
        pagination::{Pagination, PaginationQuery},
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

/// 关注用户
/// POST /users/:user_id/follow
pub async fn follow_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(target_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let target_id = parse_id(&target_id, "user")?;
    debug!("User {} following user {}", user.id, target_id);

    state.follow_service.follow(user.id, target_id)?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Followed"))))
}

/// 取消关注用户
/// DELETE /users/:user_id/follow
pub async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(target_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let target_id = parse_id(&target_id, "user")?;
    debug!("User {} unfollowing user {}", user.id, target_id);

    state.follow_service.unfollow(user.id, target_id)?;

    Ok(Json(MessageResponse::new("Unfollowed")))
}

/// GET /users/:user_id/followers
pub async fn get_followers(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<FollowersResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let pagination = Pagination::from_query(&query, state.config.default_page_size);
    Ok(Json(state.follow_service.get_followers(user_id, pagination).into()))
}

/// GET /users/:user_id/following
pub async fn get_following(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<FollowingResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let pagination = Pagination::from_query(&query, state.config.default_page_size);
    Ok(Json(state.follow_service.get_following(user_id, pagination).into()))
}

/// GET /me/followers
pub async fn get_my_followers(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<PaginationQuery>,
) -> Json<FollowersResponse> {
    let pagination = Pagination::from_query(&query, state.config.default_page_size);
    Json(state.follow_service.get_followers(user.id, pagination).into())
}

/// GET /me/following
pub async fn get_my_following(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<PaginationQuery>,
) -> Json<FollowingResponse> {
    let pagination = Pagination::from_query(&query, state.config.default_page_size);
    Json(state.follow_service.get_following(user.id, pagination).into())
}
