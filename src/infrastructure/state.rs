use crate::domain::assets::ObjectStore;
use crate::domain::auth::AuthService;
use crate::domain::comments::CommentRepository;
use crate::domain::likes::LikeRepository;
use crate::domain::password::PasswordHashingService;
use crate::domain::pipeline::AggregationStore;
use crate::domain::users::UserRepository;
use crate::domain::videos::VideoRepository;
use crate::infrastructure::config::SessionConfig;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::pipeline::postgres::PostgresAggregationStore;
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCommentRepository, PostgresLikeRepository, PostgresUserRepository,
    PostgresVideoRepository,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub videos: Arc<dyn VideoRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub aggregation: Arc<dyn AggregationStore>,
    pub object_store: Arc<dyn ObjectStore>,
    pub auth_service: Arc<dyn AuthService>,
    pub password_service: Arc<dyn PasswordHashingService>,
    pub session: SessionConfig,
}

impl AppState {
    pub fn postgres(
        pool: DbPool,
        object_store: Arc<dyn ObjectStore>,
        auth_service: Arc<dyn AuthService>,
        session: SessionConfig,
    ) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            videos: Arc::new(PostgresVideoRepository::new(pool.clone())),
            likes: Arc::new(PostgresLikeRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            aggregation: Arc::new(PostgresAggregationStore::new(pool)),
            object_store,
            auth_service,
            password_service: Arc::new(PasswordService::new()),
            session,
        }
    }

    /// Every repository backed by one shared [`InMemoryStore`].
    pub fn in_memory(
        store: InMemoryStore,
        object_store: Arc<dyn ObjectStore>,
        auth_service: Arc<dyn AuthService>,
        session: SessionConfig,
    ) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            videos: store.clone(),
            likes: store.clone(),
            comments: store.clone(),
            aggregation: store,
            object_store,
            auth_service,
            password_service: Arc::new(PasswordService::new()),
            session,
        }
    }
}
