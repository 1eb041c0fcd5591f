use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::user::{AuthorInfo, Authored};
use crate::services::store::SoftDelete;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: u64,
    pub post_id: u64,
    pub user_id: u64,
    #[serde(flatten)]
    pub author: AuthorInfo,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

impl SoftDelete for Comment {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

impl Authored for Comment {
    fn author_id(&self) -> u64 {
        self.user_id
    }

    fn author_mut(&mut self) -> &mut AuthorInfo {
        &mut self.author
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
