use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::services::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub recipient_id: u64,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub source_user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Notification {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub recipient_id: u64,
    pub notification_type: NotificationType,
    pub source_user_id: u64,
    pub post_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Follow,
    Comment,
    Reaction,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub total: usize,
    pub unread: usize,
    pub offset: usize,
    pub limit: usize,
}
