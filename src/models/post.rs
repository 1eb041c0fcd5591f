use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::services::store::{Record, SoftDelete};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: u64,
    pub user_id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<u64>,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

impl Record for Post {
    fn id(&self) -> u64 {
        self.post_id
    }
}

impl SoftDelete for Post {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub media_ids: Vec<u64>,
}

/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub media_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
