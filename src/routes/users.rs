use crate::{
    error::Result,
    models::user::*,
    state::AppState,
    utils::{
        access::parse_id,
        middleware::{AuthUser, JsonBody, OptionalAuth},
        pagination::{Pagination, PaginationQuery},
    },
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// 搜索用户
/// GET /users?search&offset&limit&sort
pub async fn list_users(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<UserListQuery>,
) -> Json<Value> {
    debug!("Fetching users list with query: {:?}", query);

    let pagination = Pagination::from_query(
        &PaginationQuery {
            offset: query.offset,
            limit: query.limit,
        },
        app_state.config.default_page_size,
    );
    let sort = UserSort::parse(query.sort.as_deref());

    let page = app_state
        .user_service
        .search_users(query.search.as_deref(), sort, pagination);

    Json(json!({
        "users": page.items,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit
    }))
}

/// 获取用户资料
/// GET /users/:user_id
pub async fn get_user_profile(
    State(app_state): State<Arc<AppState>>,
    OptionalAuth(viewer): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let profile = app_state
        .user_service
        .get_profile(user_id, viewer.map(|v| v.id))?;
    Ok(Json(profile))
}

/// 更新当前用户资料
/// PATCH /me
pub async fn update_current_user_profile(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let profile = app_state.user_service.update_profile(user.id, request)?;

    Ok(Json(json!({
        "message": "Profile updated",
        "profile": profile
    })))
}
