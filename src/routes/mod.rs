pub mod auth;
pub mod comments;
pub mod feeds;
pub mod follows;
pub mod media;
pub mod notifications;
pub mod posts;
pub mod reactions;
pub mod users;

use crate::{
    error::AppError,
    state::AppState,
    utils::middleware::{auth_middleware, request_id_middleware, request_logging_middleware},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 构建应用路由
///
/// The whole route table lives here so that each path is registered once,
/// with every method it accepts.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        // 认证
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // 当前用户
        .route(
            "/me",
            patch(users::update_current_user_profile).delete(auth::delete_account),
        )
        .route("/me/password", put(auth::change_password))
        .route("/me/posts", get(posts::get_own_posts))
        .route("/me/followers", get(follows::get_my_followers))
        .route("/me/following", get(follows::get_my_following))
        // 用户
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::get_user_profile))
        .route("/users/:user_id/posts", get(posts::get_user_posts))
        .route("/users/:user_id/followers", get(follows::get_followers))
        .route("/users/:user_id/following", get(follows::get_following))
        .route(
            "/users/:user_id/follow",
            post(follows::follow_user).delete(follows::unfollow_user),
        )
        // 帖子
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/:post_id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/posts/:post_id/comments",
            get(comments::get_post_comments).post(comments::create_comment),
        )
        .route(
            "/posts/:post_id/reactions",
            get(reactions::get_reactions)
                .post(reactions::react_to_post)
                .delete(reactions::remove_reaction),
        )
        .route(
            "/comments/:comment_id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        // 时间线与通知
        .route("/feeds", get(feeds::get_news_feed))
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/:notification_id",
            patch(notifications::mark_as_read),
        )
        // 媒体
        .route("/media", post(media::upload_media))
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rainbow-social"
    }))
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// 配置 CORS：`*` 表示任意来源，否则为逗号分隔的列表
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if allowed_origins.trim() == "*" {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect();
    cors.allow_origin(origins)
}
