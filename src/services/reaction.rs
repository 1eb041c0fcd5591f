use crate::{
    error::{AppError, Result},
    models::{notification::*, reaction::*},
    services::{NotificationService, PostService},
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// post id → (user id → reaction type). One reaction per user per post.
type ReactionTable = HashMap<u64, BTreeMap<u64, String>>;

#[derive(Clone)]
pub struct ReactionService {
    reactions: Arc<Mutex<ReactionTable>>,
    posts: PostService,
    notifications: NotificationService,
}

impl ReactionService {
    pub fn new(posts: PostService, notifications: NotificationService) -> Self {
        Self {
            reactions: Arc::new(Mutex::new(HashMap::new())),
            posts,
            notifications,
        }
    }

    pub fn get_reactions(&self, post_id: u64) -> Result<ReactionSummary> {
        self.posts.ensure_exists(post_id)?;

        let reactions = self.reactions.lock();
        let Some(by_user) = reactions.get(&post_id) else {
            return Ok(ReactionSummary {
                count: 0,
                types: vec![],
                users: vec![],
                total: 0,
            });
        };

        let types: BTreeSet<&String> = by_user.values().collect();
        let users: Vec<UserReaction> = by_user
            .iter()
            .map(|(user_id, reaction_type)| UserReaction {
                user_id: *user_id,
                reaction_type: reaction_type.clone(),
            })
            .collect();

        Ok(ReactionSummary {
            count: users.len(),
            types: types.into_iter().cloned().collect(),
            total: users.len(),
            users,
        })
    }

    /// 添加或替换反应，后写覆盖
    pub fn react(&self, post_id: u64, user_id: u64, request: ReactionRequest) -> Result<()> {
        let reaction_type = request.reaction_type.trim();
        if reaction_type.is_empty() {
            return Err(AppError::bad_request("Invalid reaction type"));
        }

        let post_author = self.posts.author_of(post_id)?;

        let previous = self
            .reactions
            .lock()
            .entry(post_id)
            .or_default()
            .insert(user_id, reaction_type.to_string());

        match previous {
            Some(old) => debug!(
                "User {} changed reaction on post {} from {} to {}",
                user_id, post_id, old, reaction_type
            ),
            None => info!("User {} reacted to post {}", user_id, post_id),
        }

        self.notifications.create_notification(CreateNotificationRequest {
            recipient_id: post_author,
            notification_type: NotificationType::Reaction,
            source_user_id: user_id,
            post_id: Some(post_id),
        });

        Ok(())
    }

    pub fn remove_reaction(&self, post_id: u64, user_id: u64) -> Result<()> {
        let mut reactions = self.reactions.lock();
        let removed = reactions
            .get_mut(&post_id)
            .and_then(|by_user| by_user.remove(&user_id));

        if removed.is_none() {
            return Err(AppError::not_found("Reaction"));
        }
        if reactions.get(&post_id).is_some_and(BTreeMap::is_empty) {
            reactions.remove(&post_id);
        }

        info!("User {} removed reaction from post {}", user_id, post_id);
        Ok(())
    }

    pub fn reaction_count(&self, post_id: u64) -> usize {
        self.reactions
            .lock()
            .get(&post_id)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn has_reacted(&self, post_id: u64, user_id: u64) -> bool {
        self.reactions
            .lock()
            .get(&post_id)
            .is_some_and(|by_user| by_user.contains_key(&user_id))
    }
}
