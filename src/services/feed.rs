use crate::{
    models::{feed::*, user::AuthorInfo},
    services::{CommentService, PostService, ReactionService, UserService},
    utils::pagination::parse_limit,
};
use tracing::debug;

/// Builds the timeline out of the post, reaction, comment and user services.
#[derive(Clone)]
pub struct FeedService {
    posts: PostService,
    reactions: ReactionService,
    comments: CommentService,
    users: UserService,
}

/// `before` as Unix seconds. Anything that does not parse means "now",
/// i.e. no upper bound beyond what already exists.
pub fn parse_cursor(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

impl FeedService {
    pub fn new(
        posts: PostService,
        reactions: ReactionService,
        comments: CommentService,
        users: UserService,
    ) -> Self {
        Self {
            posts,
            reactions,
            comments,
            users,
        }
    }

    /// 获取时间线：早于游标的帖子，按创建时间倒序
    pub fn get_feed(
        &self,
        viewer_id: u64,
        before: Option<&str>,
        limit: Option<&str>,
        default_limit: usize,
    ) -> FeedResponse {
        let cursor = parse_cursor(before);
        let limit = parse_limit(limit).unwrap_or(default_limit);
        debug!("Building feed for user {} before {:?} limit {}", viewer_id, cursor, limit);

        let mut feeds: Vec<FeedItem> = self
            .posts
            .active_posts()
            .into_iter()
            .filter(|post| cursor.map_or(true, |before| post.created_at.timestamp() < before))
            .take(limit)
            .map(|post| FeedItem {
                reaction_count: self.reactions.reaction_count(post.post_id),
                comment_count: self.comments.comment_count(post.post_id),
                is_liked: self.reactions.has_reacted(post.post_id, viewer_id),
                post_id: post.post_id,
                user_id: post.user_id,
                author: AuthorInfo::default(),
                content: post.content,
                media_ids: post.media_ids,
                created_at: post.created_at,
            })
            .collect();
        self.users.attach_authors(&mut feeds);

        let next_cursor = feeds
            .last()
            .map(|item| item.created_at.timestamp().to_string())
            .unwrap_or_default();

        FeedResponse { feeds, next_cursor }
    }
}
