use crate::application::feed::views::{VideoDetail, decode};
use crate::domain::pipeline::{AggregationStore, Collection, Expr, Filter, Lookup, Pipeline};
use crate::domain::users::UserRepository;
use crate::domain::videos::VideoRepository;
use crate::shared::error::AppError;
use crate::shared::validation::parse_reference;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Loads one video with its likes and owner channel, then records the view.
pub struct VideoDetailUseCase {
    store: Arc<dyn AggregationStore>,
    video_repo: Arc<dyn VideoRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl VideoDetailUseCase {
    pub fn new(
        store: Arc<dyn AggregationStore>,
        video_repo: Arc<dyn VideoRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            store,
            video_repo,
            user_repo,
        }
    }

    pub fn pipeline(video_id: Uuid, viewer_id: Uuid) -> Pipeline {
        let viewer = Value::String(viewer_id.to_string());

        let owner = Lookup::new(Collection::Users, "owner", "id", "owner").with_pipeline(
            Pipeline::new()
                .lookup(Lookup::new(
                    Collection::Subscriptions,
                    "id",
                    "channel",
                    "subscribers",
                ))
                .add_fields(vec![
                    ("subscribers_count", Expr::Size("subscribers".to_string())),
                    (
                        "is_subscribed",
                        Expr::AnyEq {
                            array: "subscribers".to_string(),
                            field: "subscriber".to_string(),
                            value: viewer.clone(),
                        },
                    ),
                ])
                .project(&["id", "username", "avatar.url", "subscribers_count", "is_subscribed"]),
        );

        Pipeline::new()
            .filter(Filter::And(vec![
                Filter::eq("id", video_id.to_string()),
                // drafts are visible to their owner only
                Filter::Or(vec![
                    Filter::eq("is_published", true),
                    Filter::eq("owner", viewer.clone()),
                ]),
            ]))
            .lookup(Lookup::new(Collection::Likes, "id", "video", "likes"))
            .lookup(owner)
            .add_fields(vec![
                ("likes_count", Expr::Size("likes".to_string())),
                ("owner", Expr::First("owner".to_string())),
                (
                    "is_liked",
                    Expr::AnyEq {
                        array: "likes".to_string(),
                        field: "liked_by".to_string(),
                        value: viewer,
                    },
                ),
            ])
            .project(&[
                "id",
                "title",
                "description",
                "video_file.url",
                "thumbnail.url",
                "duration",
                "views",
                "is_published",
                "created_at",
                "owner",
                "likes_count",
                "is_liked",
            ])
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, video_id: &str, viewer_id: Uuid) -> Result<VideoDetail, AppError> {
        let video_id = parse_reference(video_id, "video")?;

        let doc = self
            .store
            .aggregate(Collection::Videos, &Self::pipeline(video_id, viewer_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        let mut detail: VideoDetail = decode(doc)?;

        detail.views = self
            .video_repo
            .increment_views(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        self.user_repo
            .add_to_watch_history(viewer_id, video_id)
            .await?;

        Ok(detail)
    }
}
