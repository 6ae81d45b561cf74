pub mod likes;
pub mod users;
pub mod videos;
