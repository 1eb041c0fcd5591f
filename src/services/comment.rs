use crate::{
    config::Config,
    error::{AppError, Result},
    models::{comment::*, notification::*, user::AuthorInfo},
    services::{store::SoftDelete, NotificationService, PostService, UserService},
    utils::{
        access::ensure_owner,
        pagination::{paginate, Page, Pagination},
        validation::validate_content,
    },
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Comments grouped by post, in creation order, plus a comment id → post id
/// index kept in step under the same lock.
#[derive(Default)]
struct CommentThreads {
    by_post: HashMap<u64, Vec<Comment>>,
    post_of: HashMap<u64, u64>,
    next_id: u64,
}

impl CommentThreads {
    fn find_mut(&mut self, comment_id: u64) -> Result<&mut Comment> {
        let post_id = self
            .post_of
            .get(&comment_id)
            .copied()
            .ok_or_else(|| AppError::not_found("Comment"))?;

        self.by_post
            .get_mut(&post_id)
            .and_then(|thread| thread.iter_mut().find(|c| c.comment_id == comment_id))
            .filter(|comment| !comment.is_deleted())
            .ok_or_else(|| AppError::not_found("Comment"))
    }
}

#[derive(Clone)]
pub struct CommentService {
    threads: Arc<Mutex<CommentThreads>>,
    posts: PostService,
    users: UserService,
    notifications: NotificationService,
    max_comment_length: usize,
}

impl CommentService {
    pub fn new(
        config: &Config,
        posts: PostService,
        users: UserService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            threads: Arc::new(Mutex::new(CommentThreads::default())),
            posts,
            users,
            notifications,
            max_comment_length: config.max_comment_length,
        }
    }

    pub fn create_comment(
        &self,
        post_id: u64,
        user_id: u64,
        request: CommentRequest,
    ) -> Result<Comment> {
        debug!("Creating comment on post: {}", post_id);

        validate_content(&request.content, self.max_comment_length, "Content")?;
        let post_author = self.posts.author_of(post_id)?;

        let comment = {
            let mut threads = self.threads.lock();
            threads.next_id += 1;
            let now = Utc::now();
            let comment = Comment {
                comment_id: threads.next_id,
                post_id,
                user_id,
                author: AuthorInfo::default(),
                content: request.content.trim().to_string(),
                created_at: now,
                updated_at: now,
                is_deleted: false,
            };
            threads.post_of.insert(comment.comment_id, post_id);
            threads
                .by_post
                .entry(post_id)
                .or_default()
                .push(comment.clone());
            comment
        };

        self.notifications.create_notification(CreateNotificationRequest {
            recipient_id: post_author,
            notification_type: NotificationType::Comment,
            source_user_id: user_id,
            post_id: Some(post_id),
        });

        info!("Comment {} created on post {}", comment.comment_id, post_id);
        Ok(self.with_author(comment))
    }

    /// 获取帖子的评论，按创建顺序
    pub fn get_post_comments(&self, post_id: u64, pagination: Pagination) -> Result<Page<Comment>> {
        debug!("Getting comments for post: {}", post_id);

        self.posts.ensure_exists(post_id)?;

        let comments: Vec<Comment> = self
            .threads
            .lock()
            .by_post
            .get(&post_id)
            .map(|thread| thread.iter().filter(|c| !c.is_deleted()).cloned().collect())
            .unwrap_or_default();

        let mut page = paginate(comments, pagination);
        self.users.attach_authors(&mut page.items);
        Ok(page)
    }

    pub fn comment_count(&self, post_id: u64) -> usize {
        self.threads
            .lock()
            .by_post
            .get(&post_id)
            .map(|thread| thread.iter().filter(|c| !c.is_deleted()).count())
            .unwrap_or(0)
    }

    pub fn update_comment(
        &self,
        comment_id: u64,
        user_id: u64,
        request: CommentRequest,
    ) -> Result<Comment> {
        let updated = {
            let mut threads = self.threads.lock();
            let comment = threads.find_mut(comment_id)?;
            ensure_owner(comment.user_id, user_id, "You can only edit your own comments")?;
            validate_content(&request.content, self.max_comment_length, "Content")?;

            comment.content = request.content.trim().to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        };

        info!("Comment {} updated", comment_id);
        Ok(self.with_author(updated))
    }

    pub fn delete_comment(&self, comment_id: u64, user_id: u64) -> Result<()> {
        let mut threads = self.threads.lock();
        let comment = threads.find_mut(comment_id)?;
        ensure_owner(comment.user_id, user_id, "You can only delete your own comments")?;

        comment.mark_deleted();

        info!("Comment {} soft deleted", comment_id);
        Ok(())
    }

    fn with_author(&self, mut comment: Comment) -> Comment {
        self.users.attach_authors(std::slice::from_mut(&mut comment));
        comment
    }
}

impl From<Page<Comment>> for CommentListResponse {
    fn from(page: Page<Comment>) -> Self {
        Self {
            comments: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{post::CreatePostRequest, user::RegisterRequest};

    struct Fixture {
        posts: PostService,
        users: UserService,
        notifications: NotificationService,
        comments: CommentService,
    }

    fn fixture() -> Fixture {
        let config = Config::default();
        let posts = PostService::new(&config);
        let users = UserService::new();
        let notifications = NotificationService::new();
        let comments = CommentService::new(
            &config,
            posts.clone(),
            users.clone(),
            notifications.clone(),
        );
        Fixture {
            posts,
            users,
            notifications,
            comments,
        }
    }

    fn post(f: &Fixture, author: u64) -> u64 {
        f.posts
            .create_post(
                author,
                CreatePostRequest {
                    content: "post".to_string(),
                    media_ids: vec![],
                },
            )
            .unwrap()
            .post_id
    }

    fn comment(f: &Fixture, post_id: u64, user: u64, text: &str) -> Comment {
        f.comments
            .create_comment(
                post_id,
                user,
                CommentRequest {
                    content: text.to_string(),
                },
            )
            .unwrap()
    }

    #[test]
    fn test_comments_on_missing_post() {
        let f = fixture();
        assert!(matches!(
            f.comments.get_post_comments(42, Pagination::new(0, 10)),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.comments.create_comment(42, 1, CommentRequest { content: "hi".to_string() }),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_existing_post_without_comments_is_empty() {
        let f = fixture();
        let post_id = post(&f, 1);
        let page = f.comments.get_post_comments(post_id, Pagination::new(0, 10)).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_create_list_and_notify_author() {
        let f = fixture();
        let post_id = post(&f, 1);
        comment(&f, post_id, 2, "first");
        comment(&f, post_id, 1, "own reply");
        comment(&f, post_id, 3, "third");

        let page = f.comments.get_post_comments(post_id, Pagination::new(1, 10)).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].content, "own reply");

        // author is notified of the two foreign comments only
        let inbox = f.notifications.get_notifications(1, Pagination::new(0, 10));
        assert_eq!(inbox.total, 2);
        assert!(inbox
            .notifications
            .iter()
            .all(|n| n.notification_type == NotificationType::Comment));
    }

    #[test]
    fn test_update_and_delete_ownership() {
        let f = fixture();
        let post_id = post(&f, 1);
        let c = comment(&f, post_id, 2, "hello");

        let denied = f.comments.update_comment(
            c.comment_id,
            1,
            CommentRequest {
                content: "edit".to_string(),
            },
        );
        assert!(matches!(denied, Err(AppError::Authorization(_))));

        let edited = f
            .comments
            .update_comment(
                c.comment_id,
                2,
                CommentRequest {
                    content: "edited".to_string(),
                },
            )
            .unwrap();
        assert_eq!(edited.content, "edited");
        assert!(edited.updated_at >= c.updated_at);

        assert!(matches!(
            f.comments.delete_comment(c.comment_id, 1),
            Err(AppError::Authorization(_))
        ));
        f.comments.delete_comment(c.comment_id, 2).unwrap();

        assert_eq!(f.comments.comment_count(post_id), 0);
        let page = f.comments.get_post_comments(post_id, Pagination::new(0, 10)).unwrap();
        assert_eq!(page.total, 0);

        // gone for everyone, NotFound wins over Forbidden
        assert!(matches!(
            f.comments.delete_comment(c.comment_id, 1),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.comments.update_comment(999, 1, CommentRequest { content: "x".to_string() }),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_comments_carry_author_username() {
        let f = fixture();
        let erin = f
            .users
            .create_account(RegisterRequest {
                username: "erin".to_string(),
                email: "erin@example.com".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        let post_id = post(&f, 1);
        comment(&f, post_id, erin.id, "from erin");
        comment(&f, post_id, 77, "from nobody");

        let page = f.comments.get_post_comments(post_id, Pagination::new(0, 10)).unwrap();
        assert_eq!(page.items[0].author.username, "erin");
        assert_eq!(page.items[0].author.avatar, None);
        assert_eq!(page.items[1].author, AuthorInfo::default());

        f.users.delete_account(erin.id).unwrap();
        let page = f.comments.get_post_comments(post_id, Pagination::new(0, 10)).unwrap();
        assert_eq!(page.items[0].author.username, "");
    }

    #[test]
    fn test_update_checks_comment_before_content() {
        let f = fixture();
        let post_id = post(&f, 1);
        let c = comment(&f, post_id, 2, "hello");
        let blank = || CommentRequest {
            content: " ".to_string(),
        };

        assert!(matches!(
            f.comments.update_comment(999, 2, blank()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.comments.update_comment(c.comment_id, 1, blank()),
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            f.comments.update_comment(c.comment_id, 2, blank()),
            Err(AppError::BadRequest(_))
        ));
    }
}
