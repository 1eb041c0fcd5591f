use crate::{
    config::Config,
    error::Result,
    models::user::*,
    services::UserService,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 已认证的当前用户
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
}

/// Maps a bearer token to the user making the request.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, bearer_token: &str) -> Option<CurrentUser>;
}

/// Treats every non-empty token as the configured user.
#[derive(Debug, Clone)]
pub struct FixedIdentityResolver {
    user_id: u64,
}

impl FixedIdentityResolver {
    pub fn new(user_id: u64) -> Self {
        Self { user_id }
    }
}

impl IdentityResolver for FixedIdentityResolver {
    fn resolve(&self, bearer_token: &str) -> Option<CurrentUser> {
        if bearer_token.trim().is_empty() {
            return None;
        }
        Some(CurrentUser { id: self.user_id })
    }
}

/// Tokens handed out by register/login, and the ones revoked since.
#[derive(Default)]
struct SessionTable {
    active: HashMap<String, u64>,
    revoked: HashSet<String>,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    resolver: Arc<dyn IdentityResolver>,
    sessions: Arc<Mutex<SessionTable>>,
}

impl AuthService {
    pub fn new(config: &Config, users: UserService) -> Self {
        Self::with_resolver(
            users,
            Arc::new(FixedIdentityResolver::new(config.current_user_id)),
        )
    }

    pub fn with_resolver(users: UserService, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            users,
            resolver,
            sessions: Arc::new(Mutex::new(SessionTable::default())),
        }
    }

    pub fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let account = self.users.create_account(request)?;
        Ok(self.issue_token(account.id))
    }

    pub fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        debug!("Login attempt for: {}", request.login);

        let account = self
            .users
            .verify_credentials(&request.login, &request.password)
            .map_err(|e| {
                warn!("Failed login for: {}", request.login);
                e
            })?;

        info!("User {} logged in", account.id);
        Ok(self.issue_token(account.id))
    }

    pub fn change_password(&self, user_id: u64, request: ChangePasswordRequest) -> Result<()> {
        self.users.change_password(user_id, request)
    }

    /// Soft-deletes the account and revokes every token issued for it.
    pub fn delete_account(&self, user_id: u64) -> Result<()> {
        self.users.delete_account(user_id)?;

        let mut sessions = self.sessions.lock();
        let tokens: Vec<String> = sessions
            .active
            .iter()
            .filter(|(_, owner)| **owner == user_id)
            .map(|(token, _)| token.clone())
            .collect();
        for token in tokens {
            sessions.active.remove(&token);
            sessions.revoked.insert(token);
        }

        info!("Revoked tokens of user {}", user_id);
        Ok(())
    }

    /// 解析 Bearer token。已签发的 token 优先，已吊销的 token 不再解析，
    /// 其余交给 resolver
    pub fn resolve(&self, bearer_token: &str) -> Option<CurrentUser> {
        let token = bearer_token.trim();
        {
            let sessions = self.sessions.lock();
            if let Some(id) = sessions.active.get(token).copied() {
                return Some(CurrentUser { id });
            }
            if sessions.revoked.contains(token) {
                warn!("Rejected revoked token");
                return None;
            }
        }
        self.resolver.resolve(token)
    }

    fn issue_token(&self, user_id: u64) -> AuthResponse {
        let token = format!("demo-{}", Uuid::new_v4().simple());
        self.sessions.lock().active.insert(token.clone(), user_id);
        AuthResponse { user_id, token }
    }
}
