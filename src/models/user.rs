use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::services::store::SoftDelete;

/// 账户记录。username 与 email 的二级索引由 UserService 维护
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_private: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SoftDelete for Account {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

/// 列表项中附带的作者展示信息。未知或已注销的用户留空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Items that show who wrote or owns them.
pub trait Authored {
    fn author_id(&self) -> u64;
    fn author_mut(&mut self) -> &mut AuthorInfo;
}

/// 对外展示的用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: u64,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn to_author_info(&self) -> AuthorInfo {
        AuthorInfo {
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn to_profile(&self) -> ProfileResponse {
        ProfileResponse {
            user_id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            is_private: self.is_private,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
    #[validate(length(max = 160))]
    pub bio: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: u64,
    pub token: String,
}

/// 用户搜索排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    Id,
    Username,
    UsernameDesc,
    CreatedAt,
    CreatedAtDesc,
}

impl UserSort {
    /// Unknown values fall back to id order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("username") => UserSort::Username,
            Some("-username") => UserSort::UsernameDesc,
            Some("created_at") => UserSort::CreatedAt,
            Some("-created_at") => UserSort::CreatedAtDesc,
            _ => UserSort::Id,
        }
    }
}
