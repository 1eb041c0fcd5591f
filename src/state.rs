use crate::{
    config::Config,
    services::{
        auth::AuthService,
        comment::CommentService,
        feed::FeedService,
        follow::FollowService,
        media::MediaService,
        notification::NotificationService,
        post::PostService,
        reaction::ReactionService,
        user::UserService,
    },
};

/// 应用程序的共享状态
/// 包含所有服务和配置的引用
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 认证服务
    pub auth_service: AuthService,

    /// 用户服务
    pub user_service: UserService,

    /// 帖子服务
    pub post_service: PostService,

    /// 评论服务
    pub comment_service: CommentService,

    /// 反应服务
    pub reaction_service: ReactionService,

    /// 关注服务
    pub follow_service: FollowService,

    /// 时间线服务
    pub feed_service: FeedService,

    /// 通知服务
    pub notification_service: NotificationService,

    /// 媒体服务
    pub media_service: MediaService,
}

impl AppState {
    /// Wire every service together. Services that emit notifications share
    /// the one notification inbox, and list readers share the one account
    /// directory for author names.
    pub fn new(config: Config) -> Self {
        let user_service = UserService::new();
        let auth_service = AuthService::new(&config, user_service.clone());
        let notification_service = NotificationService::new();
        let post_service = PostService::new(&config);
        let comment_service = CommentService::new(
            &config,
            post_service.clone(),
            user_service.clone(),
            notification_service.clone(),
        );
        let reaction_service =
            ReactionService::new(post_service.clone(), notification_service.clone());
        let follow_service =
            FollowService::new(user_service.clone(), notification_service.clone());
        let feed_service = FeedService::new(
            post_service.clone(),
            reaction_service.clone(),
            comment_service.clone(),
            user_service.clone(),
        );
        let media_service = MediaService::new(&config, post_service.clone());

        Self {
            config,
            auth_service,
            user_service,
            post_service,
            comment_service,
            reaction_service,
            follow_service,
            feed_service,
            notification_service,
            media_service,
        }
    }
}
