use crate::{
    error::{AppError, Result},
    models::user::*,
    services::store::SoftDelete,
    utils::{
        access::ensure_owner,
        pagination::{paginate, Page, Pagination},
        validation::{index_key, validate_email_format, validate_username},
    },
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Primary map keyed by id plus the username/email lookup indexes.
///
/// All three maps live behind one lock; `insert` and `rename` are the only
/// paths that touch the indexes.
#[derive(Default)]
struct AccountDirectory {
    accounts: BTreeMap<u64, Account>,
    by_username: HashMap<String, u64>,
    by_email: HashMap<String, u64>,
    next_id: u64,
}

impl AccountDirectory {
    fn insert(&mut self, username: &str, email: &str, password: &str) -> Result<Account> {
        let username_key = index_key(username);
        let email_key = index_key(email);

        if self.by_username.contains_key(&username_key) {
            return Err(AppError::bad_request("Username already taken"));
        }
        if self.by_email.contains_key(&email_key) {
            return Err(AppError::bad_request("Email already registered"));
        }

        self.next_id += 1;
        let now = Utc::now();
        let account = Account {
            id: self.next_id,
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            avatar: None,
            bio: None,
            is_private: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.by_username.insert(username_key, account.id);
        self.by_email.insert(email_key, account.id);
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn rename(&mut self, id: u64, new_username: &str) -> Result<()> {
        let new_key = index_key(new_username);
        match self.by_username.get(&new_key) {
            Some(owner) if *owner == id => {}
            Some(_) => return Err(AppError::bad_request("Username already taken")),
            None => {}
        }

        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User"))?;
        self.by_username.remove(&index_key(&account.username));
        self.by_username.insert(new_key, id);
        account.username = new_username.trim().to_string();
        Ok(())
    }

    fn active_mut(&mut self, id: u64) -> Result<&mut Account> {
        self.accounts
            .get_mut(&id)
            .filter(|account| !account.is_deleted())
            .ok_or_else(|| AppError::not_found("User"))
    }

    fn find_by_login(&self, login: &str) -> Option<&Account> {
        let key = index_key(login);
        self.by_username
            .get(&key)
            .or_else(|| self.by_email.get(&key))
            .and_then(|id| self.accounts.get(id))
    }
}

/// 用户服务：账户与资料
#[derive(Clone)]
pub struct UserService {
    directory: Arc<Mutex<AccountDirectory>>,
}

impl UserService {
    pub fn new() -> Self {
        Self {
            directory: Arc::new(Mutex::new(AccountDirectory::default())),
        }
    }

    pub fn create_account(&self, request: RegisterRequest) -> Result<Account> {
        debug!("Creating account for username: {}", request.username);

        request.validate()?;
        validate_username(request.username.trim())?;
        validate_email_format(request.email.trim())?;

        let account = self
            .directory
            .lock()
            .insert(&request.username, &request.email, &request.password)?;

        info!("Account {} created ({})", account.id, account.username);
        Ok(account)
    }

    /// Look up an active account by username or email and check its password.
    pub fn verify_credentials(&self, login: &str, password: &str) -> Result<Account> {
        let directory = self.directory.lock();
        match directory.find_by_login(login) {
            Some(account) if !account.is_deleted && account.password == password => {
                Ok(account.clone())
            }
            _ => Err(AppError::unauthorized("Invalid credentials")),
        }
    }

    pub fn change_password(&self, user_id: u64, request: ChangePasswordRequest) -> Result<()> {
        debug!("Changing password for user: {}", user_id);

        request.validate()?;
        if request.new_password.trim().is_empty() {
            return Err(AppError::bad_request("New password must not be empty"));
        }

        let mut directory = self.directory.lock();
        let account = directory.active_mut(user_id)?;
        if account.password != request.old_password {
            return Err(AppError::forbidden("Invalid old password"));
        }

        account.password = request.new_password;
        account.updated_at = Utc::now();
        info!("Password updated for user {}", user_id);
        Ok(())
    }

    pub fn delete_account(&self, user_id: u64) -> Result<()> {
        let mut directory = self.directory.lock();
        directory.active_mut(user_id)?.mark_deleted();
        info!("Account {} soft deleted", user_id);
        Ok(())
    }

    pub fn get_account(&self, user_id: u64) -> Result<Account> {
        let mut directory = self.directory.lock();
        directory.active_mut(user_id).map(|account| account.clone())
    }

    /// Fill in username and avatar for each item under a single lock.
    /// Unknown and soft-deleted accounts leave the item's author blank.
    pub fn attach_authors<T: Authored>(&self, items: &mut [T]) {
        let directory = self.directory.lock();
        for item in items.iter_mut() {
            *item.author_mut() = directory
                .accounts
                .get(&item.author_id())
                .filter(|account| !account.is_deleted())
                .map(Account::to_author_info)
                .unwrap_or_default();
        }
    }

    /// 获取用户资料。私密资料只对本人可见
    pub fn get_profile(&self, user_id: u64, viewer_id: Option<u64>) -> Result<ProfileResponse> {
        debug!("Getting profile for user: {}", user_id);

        let account = self.get_account(user_id)?;
        if account.is_private {
            let viewer = viewer_id.ok_or_else(|| AppError::forbidden("Private profile"))?;
            ensure_owner(account.id, viewer, "Private profile")?;
        }

        Ok(account.to_profile())
    }

    pub fn update_profile(
        &self,
        user_id: u64,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse> {
        debug!("Updating profile for user: {}", user_id);

        request.validate()?;
        let new_username = match request.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                validate_username(name)?;
                Some(name.to_string())
            }
            _ => None,
        };

        let mut directory = self.directory.lock();
        directory.active_mut(user_id)?;

        if let Some(name) = new_username {
            directory.rename(user_id, &name)?;
        }

        let account = directory.active_mut(user_id)?;
        if let Some(avatar) = request.avatar.filter(|a| !a.trim().is_empty()) {
            account.avatar = Some(avatar);
        }
        if let Some(bio) = request.bio.filter(|b| !b.trim().is_empty()) {
            account.bio = Some(bio);
        }
        if let Some(is_private) = request.is_private {
            account.is_private = is_private;
        }
        account.updated_at = Utc::now();

        info!("Profile updated for user {}", user_id);
        Ok(account.to_profile())
    }

    pub fn search_users(
        &self,
        search: Option<&str>,
        sort: UserSort,
        pagination: Pagination,
    ) -> Page<ProfileResponse> {
        let needle = search.map(index_key).filter(|s| !s.is_empty());
        debug!("Searching users: {:?}", needle);

        let mut matches: Vec<Account> = {
            let directory = self.directory.lock();
            directory
                .accounts
                .values()
                .filter(|account| !account.is_deleted)
                .filter(|account| match &needle {
                    Some(needle) => account.username.to_lowercase().contains(needle.as_str()),
                    None => true,
                })
                .cloned()
                .collect()
        };

        match sort {
            UserSort::Id => matches.sort_by_key(|a| a.id),
            UserSort::Username => matches.sort_by_key(|a| a.username.to_lowercase()),
            UserSort::UsernameDesc => {
                matches.sort_by_key(|a| std::cmp::Reverse(a.username.to_lowercase()))
            }
            UserSort::CreatedAt => matches.sort_by_key(|a| (a.created_at, a.id)),
            UserSort::CreatedAtDesc => {
                matches.sort_by_key(|a| std::cmp::Reverse((a.created_at, a.id)))
            }
        }

        let profiles = matches.iter().map(Account::to_profile).collect();
        paginate(profiles, pagination)
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::follow::FollowEntry;

    fn register(service: &UserService, username: &str) -> Account {
        service
            .create_account(RegisterRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "secret".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_register_and_login_by_username_or_email() {
        let service = UserService::new();
        let alice = register(&service, "alice");

        assert_eq!(service.verify_credentials("ALICE", "secret").unwrap().id, alice.id);
        assert_eq!(
            service.verify_credentials("alice@example.com", "secret").unwrap().id,
            alice.id
        );
        assert!(matches!(
            service.verify_credentials("alice", "wrong"),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_duplicate_username_or_email_rejected() {
        let service = UserService::new();
        register(&service, "alice");

        let dup_name = service.create_account(RegisterRequest {
            username: "Alice".to_string(),
            email: "other@example.com".to_string(),
            password: "x".to_string(),
        });
        assert!(matches!(dup_name, Err(AppError::BadRequest(_))));

        let dup_email = service.create_account(RegisterRequest {
            username: "alice2".to_string(),
            email: "ALICE@example.com".to_string(),
            password: "x".to_string(),
        });
        assert!(matches!(dup_email, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rename_keeps_index_consistent() {
        let service = UserService::new();
        let alice = register(&service, "alice");
        register(&service, "bob");

        let taken = service.update_profile(
            alice.id,
            UpdateProfileRequest {
                username: Some("bob".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(taken, Err(AppError::BadRequest(_))));

        service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    username: Some("alicia".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(service.verify_credentials("alice", "secret").is_err());
        assert_eq!(service.verify_credentials("alicia", "secret").unwrap().id, alice.id);
        // email index still points at the same record
        assert_eq!(
            service.verify_credentials("alice@example.com", "secret").unwrap().username,
            "alicia"
        );
    }

    #[test]
    fn test_private_profile_visible_to_owner_only() {
        let service = UserService::new();
        let alice = register(&service, "alice");
        service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    is_private: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(service.get_profile(alice.id, Some(alice.id)).is_ok());
        assert!(matches!(
            service.get_profile(alice.id, Some(99)),
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            service.get_profile(alice.id, None),
            Err(AppError::Authorization(_))
        ));
        // missing wins over private
        assert!(matches!(
            service.get_profile(404, Some(99)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_change_password() {
        let service = UserService::new();
        let alice = register(&service, "alice");

        let wrong = service.change_password(
            alice.id,
            ChangePasswordRequest {
                old_password: "nope".to_string(),
                new_password: "new".to_string(),
            },
        );
        assert!(matches!(wrong, Err(AppError::Authorization(_))));

        service
            .change_password(
                alice.id,
                ChangePasswordRequest {
                    old_password: "secret".to_string(),
                    new_password: "new".to_string(),
                },
            )
            .unwrap();
        assert!(service.verify_credentials("alice", "new").is_ok());
    }

    #[test]
    fn test_deleted_account_is_hidden() {
        let service = UserService::new();
        let alice = register(&service, "alice");
        register(&service, "alfred");

        service.delete_account(alice.id).unwrap();

        assert!(service.verify_credentials("alice", "secret").is_err());
        assert!(matches!(service.get_profile(alice.id, None), Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_account(alice.id), Err(AppError::NotFound(_))));

        let page = service.search_users(Some("al"), UserSort::Id, Pagination::new(0, 10));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].username, "alfred");
    }

    #[test]
    fn test_attach_authors_skips_unknown_and_deleted() {
        let service = UserService::new();
        let alice = register(&service, "alice");
        let bob = register(&service, "bob");
        service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    avatar: Some("/a.png".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .unwrap();
        service.delete_account(bob.id).unwrap();

        let now = Utc::now();
        let mut entries = vec![
            FollowEntry::new(alice.id, now),
            FollowEntry::new(bob.id, now),
            FollowEntry::new(99, now),
        ];
        service.attach_authors(&mut entries);

        assert_eq!(entries[0].user.username, "alice");
        assert_eq!(entries[0].user.avatar.as_deref(), Some("/a.png"));
        assert_eq!(entries[1].user, AuthorInfo::default());
        assert_eq!(entries[2].user, AuthorInfo::default());
    }

    #[test]
    fn test_search_sort_and_paginate() {
        let service = UserService::new();
        for name in ["carol", "alice", "bob", "Alina"] {
            register(&service, name);
        }

        let page = service.search_users(None, UserSort::Username, Pagination::new(0, 2));
        assert_eq!(page.total, 4);
        let names: Vec<_> = page.items.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "Alina"]);

        let page = service.search_users(Some("ALI"), UserSort::UsernameDesc, Pagination::new(0, 10));
        let names: Vec<_> = page.items.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["Alina", "alice"]);

        let page = service.search_users(None, UserSort::Id, Pagination::new(10, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 4);
    }
}
