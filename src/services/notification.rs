use crate::{
    error::Result,
    models::notification::*,
    services::store::Store,
    utils::{
        access::ensure_owner,
        pagination::{paginate, Pagination},
    },
};
use chrono::Utc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct NotificationService {
    store: Store<Notification>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            store: Store::new("Notification"),
        }
    }

    /// Append a notification. Self-notifications are dropped.
    pub fn create_notification(&self, request: CreateNotificationRequest) -> Option<Notification> {
        if request.recipient_id == request.source_user_id {
            return None;
        }

        let notification = self.store.insert_with(|id| Notification {
            id,
            recipient_id: request.recipient_id,
            notification_type: request.notification_type,
            source_user_id: request.source_user_id,
            post_id: request.post_id,
            read: false,
            created_at: Utc::now(),
        });

        debug!(
            "Notification {} ({:?}) queued for user {}",
            notification.id, notification.notification_type, notification.recipient_id
        );
        Some(notification)
    }

    /// 获取用户通知，最新的在前
    pub fn get_notifications(
        &self,
        user_id: u64,
        pagination: Pagination,
    ) -> NotificationListResponse {
        debug!("Getting notifications for user: {}", user_id);

        let mut notifications: Vec<Notification> = self
            .store
            .list()
            .into_iter()
            .filter(|n| n.recipient_id == user_id)
            .collect();
        notifications.reverse();

        let unread = notifications.iter().filter(|n| !n.read).count();
        let page = paginate(notifications, pagination);

        NotificationListResponse {
            notifications: page.items,
            total: page.total,
            unread,
            offset: page.offset,
            limit: page.limit,
        }
    }

    pub fn mark_as_read(&self, notification_id: u64, user_id: u64) -> Result<Notification> {
        let updated = self.store.modify(notification_id, |notification| {
            ensure_owner(notification.recipient_id, user_id, "Forbidden")?;
            notification.read = true;
            Ok(notification.clone())
        })?;

        info!("Notification {} marked as read", notification_id);
        Ok(updated)
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
