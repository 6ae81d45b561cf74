use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Channel/subscriber edge. Only read through aggregation pipelines.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber: Uuid,
    pub channel: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
