use crate::{
    error::Result,
    models::{response::MessageResponse, user::*},
    state::AppState,
    utils::middleware::{AuthUser, JsonBody},
};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::info;

/// 注册
/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth_service.register(request)?;
    info!("Registered user {}", response.user_id);
    Ok((StatusCode::CREATED, Json(response)))
}

/// 登录
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(state.auth_service.login(request)?))
}

/// 修改密码
/// PUT /me/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth_service.change_password(user.id, request)?;
    Ok(Json(MessageResponse::new("Password updated")))
}

/// 注销账户（软删除）
/// DELETE /me
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>> {
    state.auth_service.delete_account(user.id)?;
    Ok(Json(MessageResponse::new("Account soft deleted")))
}
