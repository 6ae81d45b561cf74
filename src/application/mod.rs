pub mod assets;
pub mod auth;
pub mod feed;
pub mod likes;
pub mod users;
pub mod videos;
