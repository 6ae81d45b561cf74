use crate::application::feed::views::{VideoFeedItem, decode};
use crate::domain::pipeline::{
    AggregationStore, Collection, Expr, Filter, Lookup, Pipeline, SortDirection, SortKey,
    ValueKind,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::parse_reference;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListVideosQuery {
    /// 1-indexed page, default 1
    pub page: Option<u64>,
    /// Page size, default 10, at most 100
    pub limit: Option<u64>,
    /// Whitespace-separated terms matched against title and description
    pub query: Option<String>,
    /// One of `views`, `createdAt`, `duration`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_type: Option<String>,
    /// Restrict to one channel
    pub user_id: Option<String>,
}

/// Resolves the requested ordering. Both parts must be present to take
/// effect; otherwise the feed is newest first.
pub fn resolve_sort(sort_by: Option<&str>, sort_type: Option<&str>) -> Result<SortKey, AppError> {
    let (Some(sort_by), Some(sort_type)) = (sort_by, sort_type) else {
        return Ok(SortKey::new(
            "created_at",
            SortDirection::Desc,
            ValueKind::Timestamp,
        ));
    };

    let (field, kind) = match sort_by {
        "views" => ("views", ValueKind::Number),
        "createdAt" | "created_at" => ("created_at", ValueKind::Timestamp),
        "duration" => ("duration", ValueKind::Number),
        other => {
            return Err(AppError::ValidationError(format!(
                "Invalid sortBy '{other}', expected one of views, createdAt, duration"
            )));
        }
    };

    let direction = match sort_type.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        _ => {
            return Err(AppError::ValidationError(format!(
                "Invalid sortType '{sort_type}', expected asc or desc"
            )));
        }
    };

    Ok(SortKey::new(field, direction, kind))
}

/// Owner join shared by the feed pipelines.
pub(crate) fn owner_lookup(fields: &[&str]) -> Lookup {
    Lookup::new(Collection::Users, "owner", "id", "owner")
        .with_pipeline(Pipeline::new().project(fields))
}

pub struct ListVideosUseCase {
    store: Arc<dyn AggregationStore>,
}

impl ListVideosUseCase {
    pub fn new(store: Arc<dyn AggregationStore>) -> Self {
        Self { store }
    }

    /// Builds the feed pipeline: search, owner, published-only, sort, owner join.
    pub fn pipeline(query: &ListVideosQuery) -> Result<Pipeline, AppError> {
        let mut pipeline = Pipeline::new();

        if let Some(text) = query.query.as_deref().filter(|q| !q.trim().is_empty()) {
            pipeline = pipeline.filter(Filter::text(text, &["title", "description"]));
        }

        if let Some(user_id) = query.user_id.as_deref() {
            let owner = parse_reference(user_id, "user")?;
            pipeline = pipeline.filter(Filter::eq("owner", owner.to_string()));
        }

        let sort = resolve_sort(query.sort_by.as_deref(), query.sort_type.as_deref())?;

        Ok(pipeline
            .filter(Filter::eq("is_published", true))
            .sort(vec![sort])
            .lookup(owner_lookup(&["id", "username", "avatar.url"]))
            .add_fields(vec![("owner", Expr::First("owner".to_string()))]))
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, query: ListVideosQuery) -> Result<Page<VideoFeedItem>, AppError> {
        let pipeline = Self::pipeline(&query)?;
        let page = PageRequest::new(query.page, query.limit);

        self.store
            .aggregate_paginate(Collection::Videos, &pipeline, page)
            .await?
            .try_map(decode)
    }
}
