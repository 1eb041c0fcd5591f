use crate::{models::feed::FeedResponse, state::AppState, utils::middleware::AuthUser};
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Unix seconds; only posts strictly older are returned.
    pub before: Option<String>,
    pub limit: Option<String>,
}

/// 获取时间线
/// GET /feeds?before&limit
pub async fn get_news_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    Json(state.feed_service.get_feed(
        user.id,
        query.before.as_deref(),
        query.limit.as_deref(),
        state.config.default_page_size,
    ))
}
