pub mod store;
pub mod auth;
pub mod user;
pub mod post;
pub mod comment;
pub mod reaction;
pub mod follow;
pub mod feed;
pub mod notification;
pub mod media;

// 重新导出常用类型
pub use store::Store;
pub use auth::AuthService;
pub use user::UserService;
pub use post::PostService;
pub use comment::CommentService;
pub use reaction::ReactionService;
pub use follow::FollowService;
pub use feed::FeedService;
pub use notification::NotificationService;
pub use media::MediaService;
