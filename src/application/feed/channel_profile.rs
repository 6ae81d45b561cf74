use crate::application::feed::views::{ChannelProfile, decode};
use crate::domain::pipeline::{AggregationStore, Collection, Expr, Filter, Lookup, Pipeline};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct ChannelProfileUseCase {
    store: Arc<dyn AggregationStore>,
}

impl ChannelProfileUseCase {
    pub fn new(store: Arc<dyn AggregationStore>) -> Self {
        Self { store }
    }

    pub fn pipeline(username: &str, viewer: Option<Uuid>) -> Pipeline {
        let is_subscribed = match viewer {
            Some(viewer) => Expr::AnyEq {
                array: "subscribers".to_string(),
                field: "subscriber".to_string(),
                value: Value::String(viewer.to_string()),
            },
            None => Expr::Literal(Value::Bool(false)),
        };

        Pipeline::new()
            .filter(Filter::eq("username", username.trim().to_lowercase()))
            .lookup(Lookup::new(
                Collection::Subscriptions,
                "id",
                "channel",
                "subscribers",
            ))
            .lookup(Lookup::new(
                Collection::Subscriptions,
                "id",
                "subscriber",
                "subscribed_to",
            ))
            .add_fields(vec![
                ("subscribers_count", Expr::Size("subscribers".to_string())),
                (
                    "channels_subscribed_to_count",
                    Expr::Size("subscribed_to".to_string()),
                ),
                ("is_subscribed", is_subscribed),
            ])
            .project(&[
                "id",
                "full_name",
                "username",
                "email",
                "avatar.url",
                "cover_image.url",
                "subscribers_count",
                "channels_subscribed_to_count",
                "is_subscribed",
            ])
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<ChannelProfile, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::ValidationError("Username is missing".to_string()));
        }

        let doc = self
            .store
            .aggregate(Collection::Users, &Self::pipeline(username, viewer))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

        decode(doc)
    }
}
