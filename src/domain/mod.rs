pub mod assets;
pub mod auth;
pub mod comments;
pub mod likes;
pub mod password;
pub mod pipeline;
pub mod subscriptions;
pub mod users;
pub mod videos;
