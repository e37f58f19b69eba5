//! Deep merge of feature parameter documents
//!
//! Each feature descriptor doubles as a parameter document. The documents of
//! a resolved feature list are merged in order, later features overriding
//! earlier ones:
//!
//! - mappings merge key by key
//! - sequences whose elements are all mappings with a scalar `name` merge
//!   element-wise by name, new names are appended
//! - anything else is replaced
//!
//! Template operators inside values are not evaluated; they pass through.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use super::feature::Catalog;
use super::resolve::ResolveError;

/// Descriptor keys that describe the feature itself rather than parameters
pub const RESERVED_KEYS: &[&str] = &["description", "type", "features"];

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("parameter path not found: {0}")]
    PathNotFound(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Merges the documents of the given features, in order, and prunes the
/// reserved descriptor keys from the result
pub fn merge_features<S: AsRef<str>>(
    catalog: &Catalog,
    features: &[S],
) -> Result<Value, ParamsError> {
    let mut documents = Vec::with_capacity(features.len());
    for name in features {
        documents.push(&catalog.feature(name.as_ref())?.document);
    }

    let mut merged = merge_documents(documents);
    if let Value::Mapping(root) = &mut merged {
        for key in RESERVED_KEYS {
            root.shift_remove(*key);
        }
    }

    Ok(merged)
}

/// Merges documents in order; null documents are skipped
pub fn merge_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = Value::Mapping(Mapping::new());
    for document in documents {
        if !document.is_null() {
            merge_into(&mut merged, document);
        }
    }
    merged
}

fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Sequence(base), Value::Sequence(overlay)) => {
            if overlay.is_empty() || !all_named(base) || !all_named(overlay) {
                *base = overlay.clone();
                return;
            }

            for item in overlay {
                let name = entry_name(item);
                match base.iter_mut().find(|existing| entry_name(existing) == name) {
                    Some(existing) => merge_into(existing, item),
                    None => base.push(item.clone()),
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

fn all_named(items: &[Value]) -> bool {
    items.iter().all(|item| entry_name(item).is_some())
}

/// Renders a scalar (string, number or bool) as text
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Scalar `name` of a mapping entry, rendered as text
pub fn entry_name(item: &Value) -> Option<String> {
    scalar_text(item.as_mapping()?.get("name")?)
}

/// Keeps only the given dotted paths of a tree, preserving structure
///
/// A segment addresses a mapping key, or a sequence element by its `name`
/// or its index. Sequences stay sequences: picked elements keep their
/// document order and named elements keep their `name`.
pub fn cherry_pick<S: AsRef<str>>(tree: &Value, paths: &[S]) -> Result<Value, ParamsError> {
    let mut selected: Vec<Vec<&str>> = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let segments: Vec<&str> = path.split('.').collect();
        if lookup(tree, &segments).is_none() {
            return Err(ParamsError::PathNotFound(path.to_string()));
        }
        selected.push(segments);
    }

    let selected: Vec<&[&str]> = selected.iter().map(Vec::as_slice).collect();
    Ok(prune(tree, &selected))
}

fn lookup<'a>(node: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut cursor = node;
    for segment in segments {
        cursor = child(cursor, segment)?;
    }
    Some(cursor)
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Mapping(map) => map
            .iter()
            .find(|(key, _)| scalar_text(key).as_deref() == Some(segment))
            .map(|(_, value)| value),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .find(|(i, item)| addresses(*i, item, segment))
            .map(|(_, item)| item),
        Value::Tagged(tagged) => child(&tagged.value, segment),
        _ => None,
    }
}

fn addresses(index: usize, item: &Value, segment: &str) -> bool {
    entry_name(item).as_deref() == Some(segment) || index.to_string() == segment
}

/// Copies the parts of `node` reached by the remaining path segments
fn prune(node: &Value, paths: &[&[&str]]) -> Value {
    if paths.iter().any(|p| p.is_empty()) {
        return node.clone();
    }

    match node {
        Value::Mapping(map) => {
            let mut kept = Mapping::new();
            for (key, value) in map {
                let Some(text) = scalar_text(key) else {
                    continue;
                };
                let rest = remaining(paths, |head| head == text);
                if !rest.is_empty() {
                    kept.insert(key.clone(), prune(value, &rest));
                }
            }
            Value::Mapping(kept)
        }
        Value::Sequence(items) => {
            let mut kept = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let rest = remaining(paths, |head| addresses(i, item, head));
                if !rest.is_empty() {
                    kept.push(keep_name(item, prune(item, &rest)));
                }
            }
            Value::Sequence(kept)
        }
        Value::Tagged(tagged) => prune(&tagged.value, paths),
        scalar => scalar.clone(),
    }
}

/// Tails of the paths whose first segment matches
fn remaining<'p, 's>(
    paths: &[&'p [&'s str]],
    matches: impl Fn(&str) -> bool,
) -> Vec<&'p [&'s str]> {
    paths
        .iter()
        .copied()
        .filter_map(<[&str]>::split_first)
        .filter(|(head, _)| matches(head))
        .map(|(_, rest)| rest)
        .collect()
}

/// Puts the `name` of a sequence entry back onto a partial copy of it
fn keep_name(original: &Value, picked: Value) -> Value {
    let Some(name) = original.as_mapping().and_then(|m| m.get("name")) else {
        return picked;
    };
    if entry_name(original).is_none() {
        return picked;
    }

    match picked {
        Value::Mapping(fields) if !fields.contains_key("name") => {
            let mut named = Mapping::new();
            named.insert(Value::String("name".to_string()), name.clone());
            named.extend(fields);
            Value::Mapping(named)
        }
        other => other,
    }
}
