pub mod comment;
pub mod feed;
pub mod follow;
pub mod media;
pub mod notification;
pub mod post;
pub mod reaction;
pub mod response;
pub mod user;
