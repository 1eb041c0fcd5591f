use crate::{
    error::Result,
    models::notification::*,
    state::AppState,
    utils::{
        access::parse_id,
        middleware::AuthUser,
        pagination::{Pagination, PaginationQuery},
    },
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// 获取当前用户的通知
/// GET /notifications
pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<PaginationQuery>,
) -> Json<NotificationListResponse> {
    let pagination = Pagination::from_query(&query, state.config.default_page_size);
    Json(state.notification_service.get_notifications(user.id, pagination))
}

/// 标记通知为已读
/// PATCH /notifications/:notification_id
pub async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>> {
    let notification_id = parse_id(&notification_id, "notification")?;
    let notification = state
        .notification_service
        .mark_as_read(notification_id, user.id)?;

    Ok(Json(json!({
        "message": "Notification marked as read",
        "notification": notification
    })))
}
