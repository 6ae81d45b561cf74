//! Declarative aggregation pipelines.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s applied to one
//! [`Collection`] of JSON documents. Storage backends execute the whole
//! pipeline at once, so joins never turn into per-row round trips.
//! Field paths are dotted (`avatar.url`).

use crate::shared::pagination::{Page, PageRequest};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Videos,
    Likes,
    Comments,
    Subscriptions,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Videos => "videos",
            Collection::Likes => "likes",
            Collection::Comments => "comments",
            Collection::Subscriptions => "subscriptions",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    /// Case-insensitive: every whitespace-separated term must occur in at least one field.
    Text { query: String, fields: Vec<String> },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn text(query: impl Into<String>, fields: &[&str]) -> Self {
        Filter::Text {
            query: query.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Lowercased search terms of a text query.
    pub fn terms(query: &str) -> Vec<String> {
        query.split_whitespace().map(str::to_lowercase).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// How a sort field's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Timestamp,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
    pub kind: ValueKind,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection, kind: ValueKind) -> Self {
        Self {
            field: field.into(),
            direction,
            kind,
        }
    }
}

/// Computed field expressions for [`Stage::AddFields`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Length of the array at the path (0 when missing).
    Size(String),
    /// First element of the array at the path (null when empty).
    First(String),
    /// True when any element of `array` has `field` equal to `value`.
    AnyEq {
        array: String,
        field: String,
        value: Value,
    },
}

/// Join against another collection. Documents of `from` whose
/// `foreign_field` equals the local value (or any element of it, when the
/// local value is an array) are run through `pipeline` and stored as an
/// array under `as_field`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub from: Collection,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
    pub pipeline: Pipeline,
}

impl Lookup {
    pub fn new(
        from: Collection,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Self {
            from,
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
            pipeline: Pipeline::new(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    Sort(Vec<SortKey>),
    Lookup(Box<Lookup>),
    AddFields(Vec<(String, Expr)>),
    Project(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    /// Sorts by `keys`, then by `id` ascending so equal keys keep a fixed order.
    pub fn sort(mut self, mut keys: Vec<SortKey>) -> Self {
        if !keys.iter().any(|k| k.field == "id") {
            keys.push(SortKey::new("id", SortDirection::Asc, ValueKind::Text));
        }
        self.stages.push(Stage::Sort(keys));
        self
    }

    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.stages.push(Stage::Lookup(Box::new(lookup)));
        self
    }

    pub fn add_fields(mut self, fields: Vec<(&str, Expr)>) -> Self {
        self.stages.push(Stage::AddFields(
            fields
                .into_iter()
                .map(|(name, expr)| (name.to_string(), expr))
                .collect(),
        ));
        self
    }

    pub fn project(mut self, paths: &[&str]) -> Self {
        self.stages
            .push(Stage::Project(paths.iter().map(|p| p.to_string()).collect()));
        self
    }
}

/// Storage collaborator able to run aggregation pipelines.
#[async_trait]
pub trait AggregationStore: Send + Sync {
    async fn aggregate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
    ) -> Result<Vec<Value>, anyhow::Error>;

    async fn aggregate_paginate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
        page: PageRequest,
    ) -> Result<Page<Value>, anyhow::Error>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), anyhow::Error>;
}
