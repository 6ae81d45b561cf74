//! In-process pipeline evaluation over `serde_json::Value` documents.

use super::{ProjectionNode, projection_tree};
use crate::domain::pipeline::{
    Collection, Expr, Filter, Lookup, SortDirection, SortKey, Stage, ValueKind,
};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

/// Runs `stages` over `docs`. `source` yields the documents of a joined collection.
pub fn evaluate<F>(source: &F, stages: &[Stage], mut docs: Vec<Value>) -> Vec<Value>
where
    F: Fn(Collection) -> Vec<Value>,
{
    for stage in stages {
        docs = match stage {
            Stage::Match(filter) => docs.into_iter().filter(|d| matches(d, filter)).collect(),
            Stage::Sort(keys) => {
                docs.sort_by(|a, b| compare_docs(a, b, keys));
                docs
            }
            Stage::Lookup(lookup) => join(source, lookup, docs),
            Stage::AddFields(fields) => docs
                .into_iter()
                .map(|mut doc| {
                    let computed: Vec<(String, Value)> = fields
                        .iter()
                        .map(|(name, expr)| (name.clone(), eval_expr(&doc, expr)))
                        .collect();
                    for (name, value) in computed {
                        set_field(&mut doc, &name, value);
                    }
                    doc
                })
                .collect(),
            Stage::Project(paths) => {
                let tree = projection_tree(paths);
                docs.iter().map(|doc| project(doc, &tree)).collect()
            }
        };
    }
    docs
}

pub fn matches(doc: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { field, value } => get_path(doc, field) == Some(value),
        Filter::Text { query, fields } => {
            let haystacks: Vec<String> = fields
                .iter()
                .filter_map(|f| get_path(doc, f).and_then(Value::as_str))
                .map(str::to_lowercase)
                .collect();
            Filter::terms(query)
                .iter()
                .all(|term| haystacks.iter().any(|h| h.contains(term.as_str())))
        }
        Filter::And(filters) => filters.iter().all(|f| matches(doc, f)),
        Filter::Or(filters) => filters.iter().any(|f| matches(doc, f)),
    }
}

fn compare_docs(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = compare_values(
            get_path(a, &key.field),
            get_path(b, &key.field),
            key.kind,
        );
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// Missing or unparsable values sort after everything else.
fn compare_values(a: Option<&Value>, b: Option<&Value>, kind: ValueKind) -> Ordering {
    match kind {
        ValueKind::Number => {
            let a = a.and_then(Value::as_f64);
            let b = b.and_then(Value::as_f64);
            nulls_last(a, b, |x, y| x.total_cmp(y))
        }
        ValueKind::Timestamp => {
            let parse = |v: Option<&Value>| {
                v.and_then(Value::as_str)
                    .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
            };
            nulls_last(parse(a), parse(b), |x, y| x.cmp(y))
        }
        ValueKind::Text => {
            let a = a.and_then(Value::as_str);
            let b = b.and_then(Value::as_str);
            nulls_last(a, b, |x, y| x.cmp(y))
        }
    }
}

fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn correlates(local: Option<&Value>, foreign: Option<&Value>) -> bool {
    let Some(foreign) = foreign.filter(|v| !v.is_null()) else {
        return false;
    };
    match local {
        Some(Value::Array(items)) => items.contains(foreign),
        Some(local) => local == foreign,
        None => false,
    }
}

fn join<F>(source: &F, lookup: &Lookup, docs: Vec<Value>) -> Vec<Value>
where
    F: Fn(Collection) -> Vec<Value>,
{
    let foreign = source(lookup.from);
    docs.into_iter()
        .map(|mut doc| {
            let local = get_path(&doc, &lookup.local_field);
            let matched: Vec<Value> = foreign
                .iter()
                .filter(|f| correlates(local, get_path(f, &lookup.foreign_field)))
                .cloned()
                .collect();
            let joined = evaluate(source, lookup.pipeline.stages(), matched);
            set_field(&mut doc, &lookup.as_field, Value::Array(joined));
            doc
        })
        .collect()
}

fn eval_expr(doc: &Value, expr: &Expr) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Size(path) => {
            let len = get_path(doc, path)
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            Value::from(len as u64)
        }
        Expr::First(path) => get_path(doc, path)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .cloned()
            .unwrap_or(Value::Null),
        Expr::AnyEq {
            array,
            field,
            value,
        } => {
            let found = get_path(doc, array)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|i| get_path(i, field) == Some(value)));
            Value::Bool(found)
        }
    }
}

fn set_field(doc: &mut Value, name: &str, value: Value) {
    if let Some(object) = doc.as_object_mut() {
        object.insert(name.to_string(), value);
    }
}

fn project(doc: &Value, tree: &[(String, ProjectionNode)]) -> Value {
    let mut out = Map::new();
    for (name, node) in tree {
        let value = match node {
            ProjectionNode::Leaf(path) => get_path(doc, path).cloned().unwrap_or(Value::Null),
            ProjectionNode::Branch(children) => project(doc, children),
        };
        out.insert(name.clone(), value);
    }
    Value::Object(out)
}
