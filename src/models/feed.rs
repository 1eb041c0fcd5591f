use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::user::{AuthorInfo, Authored};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub post_id: u64,
    pub user_id: u64,
    #[serde(flatten)]
    pub author: AuthorInfo,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub reaction_count: usize,
    pub comment_count: usize,
    pub is_liked: bool,
}

impl Authored for FeedItem {
    fn author_id(&self) -> u64 {
        self.user_id
    }

    fn author_mut(&mut self) -> &mut AuthorInfo {
        &mut self.author
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub feeds: Vec<FeedItem>,
    /// Unix seconds of the last item, empty when the page is empty.
    pub next_cursor: String,
}
