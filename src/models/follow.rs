use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::user::{AuthorInfo, Authored};

/// One side of a follow edge as seen from the list owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowEntry {
    pub user_id: u64,
    #[serde(flatten)]
    pub user: AuthorInfo,
    pub followed_at: DateTime<Utc>,
}

impl FollowEntry {
    pub fn new(user_id: u64, followed_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            user: AuthorInfo::default(),
            followed_at,
        }
    }
}

impl Authored for FollowEntry {
    fn author_id(&self) -> u64 {
        self.user_id
    }

    fn author_mut(&mut self) -> &mut AuthorInfo {
        &mut self.user
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowersResponse {
    pub followers: Vec<FollowEntry>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowingResponse {
    pub following: Vec<FollowEntry>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
