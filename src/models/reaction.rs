use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRequest {
    #[serde(default)]
    pub reaction_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReaction {
    pub user_id: u64,
    pub reaction_type: String,
}

/// 帖子的反应汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub count: usize,
    /// Distinct reaction types, sorted.
    pub types: Vec<String>,
    pub users: Vec<UserReaction>,
    pub total: usize,
}
