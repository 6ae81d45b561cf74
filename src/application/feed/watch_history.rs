use crate::application::feed::list_videos::owner_lookup;
use crate::application::feed::views::{VideoFeedItem, decode};
use crate::domain::pipeline::{AggregationStore, Collection, Expr, Filter, Lookup, Pipeline};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct WatchHistoryUseCase {
    store: Arc<dyn AggregationStore>,
}

impl WatchHistoryUseCase {
    pub fn new(store: Arc<dyn AggregationStore>) -> Self {
        Self { store }
    }

    pub fn pipeline(user_id: Uuid) -> Pipeline {
        let videos = Pipeline::new()
            .lookup(owner_lookup(&["id", "full_name", "username", "avatar.url"]))
            .add_fields(vec![("owner", Expr::First("owner".to_string()))]);

        Pipeline::new()
            .filter(Filter::eq("id", user_id.to_string()))
            .lookup(
                Lookup::new(Collection::Videos, "watch_history", "id", "watch_history")
                    .with_pipeline(videos),
            )
            .project(&["watch_history"])
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<VideoFeedItem>, AppError> {
        let doc = self
            .store
            .aggregate(Collection::Users, &Self::pipeline(user_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        match doc.get("watch_history") {
            Some(Value::Array(items)) => items.iter().cloned().map(decode).collect(),
            _ => Ok(Vec::new()),
        }
    }
}
