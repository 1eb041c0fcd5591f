use crate::{
    config::Config,
    error::{AppError, Result},
    models::post::*,
    services::store::Store,
    utils::{
        access::ensure_owner,
        pagination::{paginate, Page, Pagination},
        validation::validate_content,
    },
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Clone)]
pub struct PostService {
    store: Store<Post>,
    max_post_length: usize,
}

impl PostService {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Store::new("Post"),
            max_post_length: config.max_post_length,
        }
    }

    pub fn create_post(&self, user_id: u64, request: CreatePostRequest) -> Result<Post> {
        self.create_post_at(user_id, request, Utc::now())
    }

    pub(crate) fn create_post_at(
        &self,
        user_id: u64,
        request: CreatePostRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Post> {
        debug!("Creating post for user: {}", user_id);

        validate_content(&request.content, self.max_post_length, "Content")?;

        let post = self.store.insert_with(|post_id| Post {
            post_id,
            user_id,
            content: request.content.trim().to_string(),
            created_at,
            updated_at: created_at,
            media_ids: request.media_ids,
            is_deleted: false,
        });

        info!("Post {} created by user {}", post.post_id, user_id);
        Ok(post)
    }

    pub fn get_post(&self, post_id: u64) -> Result<Post> {
        self.store.get_active(post_id)
    }

    /// NotFound unless the post exists and is not deleted.
    pub fn ensure_exists(&self, post_id: u64) -> Result<()> {
        self.get_post(post_id).map(|_| ())
    }

    /// 获取用户的帖子，按创建时间倒序
    pub fn get_user_posts(&self, user_id: u64, pagination: Pagination) -> Page<Post> {
        debug!("Getting posts for user: {}", user_id);

        let mut posts = self.store.filter_active(|post| post.user_id == user_id);
        sort_newest_first(&mut posts);
        paginate(posts, pagination)
    }

    /// Every live post, newest first.
    pub fn active_posts(&self) -> Vec<Post> {
        let mut posts = self.store.list_active();
        sort_newest_first(&mut posts);
        posts
    }

    pub fn update_post(
        &self,
        post_id: u64,
        user_id: u64,
        request: UpdatePostRequest,
    ) -> Result<Post> {
        debug!("User {} updating post {}", user_id, post_id);

        let max_post_length = self.max_post_length;
        let updated = self.store.update(post_id, |post| {
            ensure_owner(post.user_id, user_id, "You can only edit your own posts")?;
            if let Some(content) = &request.content {
                validate_content(content, max_post_length, "Content")?;
            }

            if let Some(content) = request.content {
                post.content = content.trim().to_string();
            }
            if let Some(media_ids) = request.media_ids {
                post.media_ids = media_ids;
            }
            post.updated_at = Utc::now();
            Ok(post.clone())
        })?;

        info!("Post {} updated", post_id);
        Ok(updated)
    }

    pub fn delete_post(&self, post_id: u64, user_id: u64) -> Result<()> {
        debug!("User {} deleting post {}", user_id, post_id);

        self.store.delete(post_id, |post| {
            ensure_owner(post.user_id, user_id, "You can only delete your own posts")
        })?;

        info!("Post {} soft deleted", post_id);
        Ok(())
    }

    pub fn author_of(&self, post_id: u64) -> Result<u64> {
        self.get_post(post_id).map(|post| post.user_id)
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.post_id.cmp(&a.post_id))
    });
}

impl From<Page<Post>> for PostListResponse {
    fn from(page: Page<Post>) -> Self {
        Self {
            posts: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn service() -> PostService {
        PostService::new(&Config::default())
    }

    fn create(service: &PostService, user_id: u64, content: &str) -> Post {
        service
            .create_post(
                user_id,
                CreatePostRequest {
                    content: content.to_string(),
                    media_ids: vec![],
                },
            )
            .unwrap()
    }

    #[test]
    fn test_create_rejects_blank_content() {
        let service = service();
        let result = service.create_post(
            1,
            CreatePostRequest {
                content: "   ".to_string(),
                media_ids: vec![],
            },
        );
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_soft_delete_hides_post_everywhere() {
        let service = service();
        let keep = create(&service, 1, "keep");
        let gone = create(&service, 1, "gone");

        assert_ok!(service.delete_post(gone.post_id, 1));

        assert!(matches!(service.get_post(gone.post_id), Err(AppError::NotFound(_))));
        let page = service.get_user_posts(1, Pagination::new(0, 10));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].post_id, keep.post_id);
        assert!(service.active_posts().iter().all(|p| p.post_id != gone.post_id));
    }

    #[test]
    fn test_only_owner_can_update_or_delete() {
        let service = service();
        let post = create(&service, 1, "mine");

        let denied = service.update_post(
            post.post_id,
            2,
            UpdatePostRequest {
                content: Some("hijacked".to_string()),
                media_ids: None,
            },
        );
        assert!(matches!(denied, Err(AppError::Authorization(_))));
        assert!(matches!(
            service.delete_post(post.post_id, 2),
            Err(AppError::Authorization(_))
        ));

        let updated = service
            .update_post(
                post.post_id,
                1,
                UpdatePostRequest {
                    content: Some("edited".to_string()),
                    media_ids: Some(vec![3]),
                },
            )
            .unwrap();
        assert_eq!(updated.content, "edited");

        let fetched = service.get_post(post.post_id).unwrap();
        assert_eq!(fetched.content, "edited");
        assert_eq!(fetched.media_ids, vec![3]);
    }

    #[test]
    fn test_not_found_takes_precedence_over_forbidden() {
        let service = service();
        let post = create(&service, 1, "mine");
        assert_ok!(service.delete_post(post.post_id, 1));

        assert!(matches!(
            service.delete_post(post.post_id, 2),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_post(999, 2, UpdatePostRequest::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_checks_record_before_content() {
        let service = service();
        let post = create(&service, 1, "mine");
        let blank = || UpdatePostRequest {
            content: Some("  ".to_string()),
            media_ids: None,
        };

        assert!(matches!(
            service.update_post(999, 1, blank()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_post(post.post_id, 2, blank()),
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            service.update_post(post.post_id, 1, blank()),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(service.get_post(post.post_id).unwrap().content, "mine");
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let service = service();
        let post = service
            .create_post(
                1,
                CreatePostRequest {
                    content: "hello".to_string(),
                    media_ids: vec![7],
                },
            )
            .unwrap();

        let updated = service
            .update_post(post.post_id, 1, UpdatePostRequest::default())
            .unwrap();
        assert_eq!(updated.content, "hello");
        assert_eq!(updated.media_ids, vec![7]);

        assert_err!(service.update_post(
            post.post_id,
            1,
            UpdatePostRequest {
                content: Some("".to_string()),
                media_ids: None,
            },
        ));
    }

    #[test]
    fn test_user_posts_newest_first_and_paginated() {
        let service = service();
        for ts in [100, 300, 200] {
            service
                .create_post_at(
                    5,
                    CreatePostRequest {
                        content: format!("at {}", ts),
                        media_ids: vec![],
                    },
                    DateTime::from_timestamp(ts, 0).unwrap(),
                )
                .unwrap();
        }
        create(&service, 6, "someone else");

        let page = service.get_user_posts(5, Pagination::new(1, 1));
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].content, "at 200");
    }
}
