//! Executors for [`crate::domain::pipeline::Pipeline`].
//!
//! Both backends follow the same rules:
//! - a missing path reads as absent; it never equals anything, including null;
//! - sort puts missing values last ascending and first descending;
//! - joined, unwound and computed fields are written at the top level;
//! - projection keeps only the listed paths, with missing leaves set to null.

pub mod memory;
pub mod postgres;

/// Projection paths folded into a tree so `avatar.url` and `avatar.remote_id`
/// share one `avatar` object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProjectionNode {
    Leaf(String),
    Branch(Vec<(String, ProjectionNode)>),
}

pub(crate) fn projection_tree(paths: &[String]) -> Vec<(String, ProjectionNode)> {
    let mut root: Vec<(String, ProjectionNode)> = Vec::new();
    for path in paths {
        insert_path(&mut root, path, path);
    }
    root
}

fn insert_path(nodes: &mut Vec<(String, ProjectionNode)>, rest: &str, full: &str) {
    let (head, tail) = match rest.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };

    let existing = nodes.iter_mut().find(|(name, _)| name == head);
    match (existing, tail) {
        // a whole-field projection already covers every sub-path
        (Some((_, ProjectionNode::Leaf(_))), _) => {}
        (Some((_, node)), None) => *node = ProjectionNode::Leaf(full.to_string()),
        (Some((_, ProjectionNode::Branch(children))), Some(tail)) => {
            insert_path(children, tail, full)
        }
        (None, None) => nodes.push((head.to_string(), ProjectionNode::Leaf(full.to_string()))),
        (None, Some(tail)) => {
            let mut children = Vec::new();
            insert_path(&mut children, tail, full);
            nodes.push((head.to_string(), ProjectionNode::Branch(children)));
        }
    }
}

pub(crate) fn path_segments(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}
