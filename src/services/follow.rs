use crate::{
    error::{AppError, Result},
    models::{follow::*, notification::*},
    services::{NotificationService, UserService},
    utils::pagination::{paginate, Page, Pagination},
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Follow edges stored from both ends.
///
/// Every edge `A → B` is present as `B` in `following[A]` and as `A` in
/// `followers[B]`. Both sides are only ever touched under the same lock.
#[derive(Default)]
struct FollowGraph {
    following: HashMap<u64, Vec<FollowEntry>>,
    followers: HashMap<u64, Vec<FollowEntry>>,
}

impl FollowGraph {
    fn is_following(&self, follower_id: u64, target_id: u64) -> bool {
        self.following
            .get(&follower_id)
            .is_some_and(|list| list.iter().any(|entry| entry.user_id == target_id))
    }
}

/// 按值移除，保持其余元素的相对顺序
fn remove_entry(lists: &mut HashMap<u64, Vec<FollowEntry>>, owner: u64, user_id: u64) {
    if let Some(list) = lists.get_mut(&owner) {
        list.retain(|entry| entry.user_id != user_id);
        if list.is_empty() {
            lists.remove(&owner);
        }
    }
}

#[derive(Clone)]
pub struct FollowService {
    graph: Arc<Mutex<FollowGraph>>,
    users: UserService,
    notifications: NotificationService,
}

impl FollowService {
    pub fn new(users: UserService, notifications: NotificationService) -> Self {
        Self {
            graph: Arc::new(Mutex::new(FollowGraph::default())),
            users,
            notifications,
        }
    }

    pub fn follow(&self, follower_id: u64, target_id: u64) -> Result<()> {
        if follower_id == target_id {
            return Err(AppError::bad_request("Cannot follow yourself"));
        }

        {
            let mut graph = self.graph.lock();
            if graph.is_following(follower_id, target_id) {
                return Err(AppError::bad_request("Already following"));
            }

            let followed_at = Utc::now();
            graph
                .following
                .entry(follower_id)
                .or_default()
                .push(FollowEntry::new(target_id, followed_at));
            graph
                .followers
                .entry(target_id)
                .or_default()
                .push(FollowEntry::new(follower_id, followed_at));
        }

        self.notifications.create_notification(CreateNotificationRequest {
            recipient_id: target_id,
            notification_type: NotificationType::Follow,
            source_user_id: follower_id,
            post_id: None,
        });

        info!("User {} followed user {}", follower_id, target_id);
        Ok(())
    }

    pub fn unfollow(&self, follower_id: u64, target_id: u64) -> Result<()> {
        let mut graph = self.graph.lock();
        if !graph.is_following(follower_id, target_id) {
            warn!(
                "User {} tried to unfollow user {} without following",
                follower_id, target_id
            );
            return Err(AppError::forbidden("Not following this user"));
        }

        remove_entry(&mut graph.following, follower_id, target_id);
        remove_entry(&mut graph.followers, target_id, follower_id);

        info!("User {} unfollowed user {}", follower_id, target_id);
        Ok(())
    }

    pub fn get_followers(&self, user_id: u64, pagination: Pagination) -> Page<FollowEntry> {
        let entries = self
            .graph
            .lock()
            .followers
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        self.with_users(paginate(entries, pagination))
    }

    pub fn get_following(&self, user_id: u64, pagination: Pagination) -> Page<FollowEntry> {
        let entries = self
            .graph
            .lock()
            .following
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        self.with_users(paginate(entries, pagination))
    }

    fn with_users(&self, mut page: Page<FollowEntry>) -> Page<FollowEntry> {
        self.users.attach_authors(&mut page.items);
        page
    }
}

impl From<Page<FollowEntry>> for FollowersResponse {
    fn from(page: Page<FollowEntry>) -> Self {
        Self {
            followers: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

impl From<Page<FollowEntry>> for FollowingResponse {
    fn from(page: Page<FollowEntry>) -> Self {
        Self {
            following: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}
