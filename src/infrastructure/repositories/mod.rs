pub mod comments;
pub mod likes;
pub mod memory;
pub mod users;
pub mod videos;

pub use comments::PostgresCommentRepository;
pub use likes::PostgresLikeRepository;
pub use memory::InMemoryStore;
pub use users::PostgresUserRepository;
pub use videos::PostgresVideoRepository;
