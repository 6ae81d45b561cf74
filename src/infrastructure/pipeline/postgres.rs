//! Compiles a [`Pipeline`] into a single Postgres statement.
//!
//! Every stage becomes one derived table yielding `(doc jsonb, ord bigint)`,
//! where `ord` carries the order established so far. Joins are correlated
//! subqueries aggregated with `jsonb_agg`, so a feed page with owners and
//! like counts costs one round trip. Field paths are always bound parameters.

use super::{ProjectionNode, path_segments, projection_tree};
use crate::domain::pipeline::{
    AggregationStore, Collection, Expr, Filter, Pipeline, SortDirection, SortKey, Stage,
    ValueKind,
};
use crate::infrastructure::db::DbPool;
use crate::shared::pagination::{Page, PageRequest};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

const USERS_SOURCE: &str = r#"
    SELECT jsonb_build_object(
        'id', t.id,
        'username', t.username,
        'email', t.email,
        'full_name', t.full_name,
        'avatar', CASE WHEN t.avatar_remote_id IS NULL THEN NULL
                  ELSE jsonb_build_object('remote_id', t.avatar_remote_id, 'url', t.avatar_url) END,
        'cover_image', CASE WHEN t.cover_image_remote_id IS NULL THEN NULL
                       ELSE jsonb_build_object('remote_id', t.cover_image_remote_id, 'url', t.cover_image_url) END,
        'watch_history', to_jsonb(t.watch_history),
        'created_at', t.created_at,
        'updated_at', t.updated_at
    ) AS doc
    FROM users t"#;

const VIDEOS_SOURCE: &str = r#"
    SELECT jsonb_build_object(
        'id', t.id,
        'title', t.title,
        'description', t.description,
        'video_file', jsonb_build_object('remote_id', t.video_file_remote_id, 'url', t.video_file_url),
        'thumbnail', jsonb_build_object('remote_id', t.thumbnail_remote_id, 'url', t.thumbnail_url),
        'duration', t.duration,
        'views', t.views,
        'is_published', t.is_published,
        'owner', t.owner_id,
        'created_at', t.created_at,
        'updated_at', t.updated_at
    ) AS doc
    FROM videos t"#;

const LIKES_SOURCE: &str = r#"
    SELECT jsonb_build_object(
        'id', t.id,
        'video', t.video_id,
        'liked_by', t.liked_by,
        'created_at', t.created_at
    ) AS doc
    FROM likes t"#;

const COMMENTS_SOURCE: &str = r#"
    SELECT jsonb_build_object(
        'id', t.id,
        'content', t.content,
        'video', t.video_id,
        'owner', t.owner_id,
        'created_at', t.created_at,
        'updated_at', t.updated_at
    ) AS doc
    FROM comments t"#;

const SUBSCRIPTIONS_SOURCE: &str = r#"
    SELECT jsonb_build_object(
        'id', t.id,
        'subscriber', t.subscriber_id,
        'channel', t.channel_id,
        'created_at', t.created_at
    ) AS doc
    FROM subscriptions t"#;

fn source_sql(collection: Collection) -> &'static str {
    match collection {
        Collection::Users => USERS_SOURCE,
        Collection::Videos => VIDEOS_SOURCE,
        Collection::Likes => LIKES_SOURCE,
        Collection::Comments => COMMENTS_SOURCE,
        Collection::Subscriptions => SUBSCRIPTIONS_SOURCE,
    }
}

/// Join condition tying a nested pipeline's base rows to the outer row.
struct Correlation<'a> {
    outer_alias: String,
    local_field: &'a str,
    foreign_field: &'a str,
}

#[derive(Default)]
struct Compiler {
    aliases: usize,
}

impl Compiler {
    fn alias(&mut self) -> String {
        self.aliases += 1;
        format!("s{}", self.aliases)
    }

    /// Emits a SELECT producing `(doc, ord)` for `stages` applied to `from`.
    fn emit(
        &mut self,
        qb: &mut QueryBuilder<'static, Postgres>,
        from: Collection,
        stages: &[Stage],
        correlation: Option<&Correlation<'_>>,
    ) {
        let Some((last, rest)) = stages.split_last() else {
            let a = self.alias();
            qb.push(format!("SELECT {a}.doc, row_number() OVER () AS ord FROM ("))
                .push(source_sql(from))
                .push(format!(") AS {a}"));
            if let Some(c) = correlation {
                qb.push(" WHERE ");
                push_correlation(qb, c, &a);
            }
            return;
        };

        let a = self.alias();
        match last {
            Stage::Match(filter) => {
                qb.push(format!("SELECT {a}.doc, {a}.ord FROM ("));
                self.emit(qb, from, rest, correlation);
                qb.push(format!(") AS {a} WHERE "));
                push_filter(qb, &a, filter);
            }
            Stage::Sort(keys) => {
                qb.push(format!("SELECT {a}.doc, row_number() OVER (ORDER BY "));
                push_sort_keys(qb, &a, keys);
                qb.push(format!(", {a}.ord) AS ord FROM ("));
                self.emit(qb, from, rest, correlation);
                qb.push(format!(") AS {a}"));
            }
            Stage::Lookup(lookup) => {
                let l = self.alias();
                qb.push(format!("SELECT {a}.doc || jsonb_build_object("));
                qb.push_bind(lookup.as_field.clone());
                qb.push(format!(
                    "::text, COALESCE((SELECT jsonb_agg({l}.doc ORDER BY {l}.ord) FROM ("
                ));
                let nested = Correlation {
                    outer_alias: a.clone(),
                    local_field: &lookup.local_field,
                    foreign_field: &lookup.foreign_field,
                };
                self.emit(qb, lookup.from, lookup.pipeline.stages(), Some(&nested));
                qb.push(format!(") AS {l}), '[]'::jsonb)) AS doc, {a}.ord FROM ("));
                self.emit(qb, from, rest, correlation);
                qb.push(format!(") AS {a}"));
            }
            Stage::AddFields(fields) => {
                qb.push(format!("SELECT {a}.doc || jsonb_build_object("));
                for (i, (name, expr)) in fields.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    qb.push_bind(name.clone());
                    qb.push("::text, ");
                    push_expr(qb, &a, expr);
                }
                qb.push(format!(") AS doc, {a}.ord FROM ("));
                self.emit(qb, from, rest, correlation);
                qb.push(format!(") AS {a}"));
            }
            Stage::Project(paths) => {
                qb.push("SELECT ");
                push_projection(qb, &a, &projection_tree(paths));
                qb.push(format!(" AS doc, {a}.ord FROM ("));
                self.emit(qb, from, rest, correlation);
                qb.push(format!(") AS {a}"));
            }
        }
    }
}

fn push_path(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, path: &str) {
    qb.push(format!("({alias}.doc #> "));
    qb.push_bind(path_segments(path));
    qb.push("::text[])");
}

fn push_text_path(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, path: &str) {
    qb.push(format!("({alias}.doc #>> "));
    qb.push_bind(path_segments(path));
    qb.push("::text[])");
}

/// The array at `path`; anything else reads as empty.
fn push_as_array(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, path: &str) {
    qb.push("CASE WHEN jsonb_typeof(");
    push_path(qb, alias, path);
    qb.push(") = 'array' THEN ");
    push_path(qb, alias, path);
    qb.push(" ELSE '[]'::jsonb END");
}

fn push_correlation(qb: &mut QueryBuilder<'static, Postgres>, c: &Correlation<'_>, alias: &str) {
    qb.push("(");
    push_path(qb, alias, c.foreign_field);
    qb.push(" IS NOT NULL AND jsonb_typeof(");
    push_path(qb, alias, c.foreign_field);
    qb.push(") <> 'null' AND CASE WHEN jsonb_typeof(");
    push_path(qb, &c.outer_alias, c.local_field);
    qb.push(") = 'array' THEN ");
    push_path(qb, &c.outer_alias, c.local_field);
    qb.push(" @> jsonb_build_array(");
    push_path(qb, alias, c.foreign_field);
    qb.push(") ELSE ");
    push_path(qb, &c.outer_alias, c.local_field);
    qb.push(" = ");
    push_path(qb, alias, c.foreign_field);
    qb.push(" END)");
}

fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, filter: &Filter) {
    match filter {
        Filter::Eq { field, value } => {
            push_path(qb, alias, field);
            qb.push(" = ");
            qb.push_bind(Json(value.clone()));
            qb.push("::jsonb");
        }
        Filter::Text { query, fields } => {
            let terms = Filter::terms(query);
            if terms.is_empty() {
                qb.push("TRUE");
                return;
            }
            qb.push("(");
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                qb.push("(");
                if fields.is_empty() {
                    qb.push("FALSE");
                }
                for (j, field) in fields.iter().enumerate() {
                    if j > 0 {
                        qb.push(" OR ");
                    }
                    qb.push("COALESCE(");
                    push_text_path(qb, alias, field);
                    qb.push(", '') ILIKE ");
                    qb.push_bind(like_pattern(term));
                }
                qb.push(")");
            }
            qb.push(")");
        }
        Filter::And(filters) => push_junction(qb, alias, filters, " AND ", "TRUE"),
        Filter::Or(filters) => push_junction(qb, alias, filters, " OR ", "FALSE"),
    }
}

fn push_junction(
    qb: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    filters: &[Filter],
    separator: &str,
    empty: &str,
) {
    if filters.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_filter(qb, alias, filter);
    }
    qb.push(")");
}

fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_sort_keys(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, keys: &[SortKey]) {
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_text_path(qb, alias, &key.field);
        qb.push(match key.kind {
            ValueKind::Number => "::double precision",
            ValueKind::Timestamp => "::timestamptz",
            ValueKind::Text => " COLLATE \"C\"",
        });
        qb.push(match key.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        });
    }
}

fn push_expr(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, expr: &Expr) {
    match expr {
        Expr::Literal(value) => {
            qb.push_bind(Json(value.clone()));
            qb.push("::jsonb");
        }
        Expr::Size(path) => {
            qb.push("to_jsonb(jsonb_array_length(");
            push_as_array(qb, alias, path);
            qb.push("))");
        }
        Expr::First(path) => {
            qb.push("COALESCE((");
            push_as_array(qb, alias, path);
            qb.push(") -> 0, 'null'::jsonb)");
        }
        Expr::AnyEq {
            array,
            field,
            value,
        } => {
            let x = format!("{alias}_x");
            qb.push("to_jsonb(EXISTS (SELECT 1 FROM jsonb_array_elements(");
            push_as_array(qb, alias, array);
            qb.push(format!(") AS {x}(value) WHERE ({x}.value #> "));
            qb.push_bind(path_segments(field));
            qb.push("::text[]) = ");
            qb.push_bind(Json(value.clone()));
            qb.push("::jsonb))");
        }
    }
}

fn push_projection(
    qb: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    nodes: &[(String, ProjectionNode)],
) {
    qb.push("jsonb_build_object(");
    for (i, (name, node)) in nodes.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push_bind(name.clone());
        qb.push("::text, ");
        match node {
            ProjectionNode::Leaf(path) => push_path(qb, alias, path),
            ProjectionNode::Branch(children) => push_projection(qb, alias, children),
        }
    }
    qb.push(")");
}

/// `SELECT q.doc FROM (<pipeline>) AS q`, without the trailing ORDER BY.
fn compile(from: Collection, pipeline: &Pipeline) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT q.doc FROM (");
    Compiler::default().emit(&mut qb, from, pipeline.stages(), None);
    qb.push(") AS q");
    qb
}

fn compile_count(from: Collection, pipeline: &Pipeline) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM (");
    Compiler::default().emit(&mut qb, from, pipeline.stages(), None);
    qb.push(") AS q");
    qb
}

#[derive(Clone)]
pub struct PostgresAggregationStore {
    pool: DbPool,
}

impl PostgresAggregationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregationStore for PostgresAggregationStore {
    #[tracing::instrument(skip(self, pipeline), fields(collection = from.name()))]
    async fn aggregate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
    ) -> Result<Vec<Value>, anyhow::Error> {
        let mut qb = compile(from, pipeline);
        qb.push(" ORDER BY q.ord");

        let rows = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    #[tracing::instrument(skip(self, pipeline), fields(collection = from.name()))]
    async fn aggregate_paginate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
        page: PageRequest,
    ) -> Result<Page<Value>, anyhow::Error> {
        let total: i64 = compile_count(from, pipeline)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = compile(from, pipeline);
        qb.push(" ORDER BY q.ord LIMIT ");
        qb.push_bind(page.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(|Json(doc)| doc).collect(),
            total.max(0) as u64,
            page,
        ))
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
