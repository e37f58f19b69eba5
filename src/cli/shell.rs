//! Shell-variable serialization of parameter trees
//!
//! Every node becomes one assignment. Containers list the names of their
//! children, so a shell script can walk the tree:
//!
//! ```text
//! _=( 'boot' 'pkgs' )
//! boot=( 'boot_mode' )
//! boot_mode='uefi'
//! pkgs=( 'curl' 'vim' )
//! ```

use serde_yaml::Value;
use thiserror::Error;

use crate::domain::{entry_name, scalar_text};

#[derive(Debug, Error, PartialEq)]
pub enum ShellError {
    #[error("parameter {0} has a key that is not a string, number or bool")]
    UnsupportedKey(String),
}

/// Renders a tree as shell assignments, parents before children
///
/// Mapping keys become part of variable names, so a key that is not a
/// scalar is rejected.
pub fn render_shell_vars(root: &Value) -> Result<Vec<String>, ShellError> {
    let mut lines = Vec::new();
    let mut stack: Vec<(String, &Value)> = vec![(String::new(), root)];

    while let Some((prefix, node)) = stack.pop() {
        match node {
            Value::Null => {}
            Value::Tagged(tagged) => stack.push((prefix, &tagged.value)),
            Value::Sequence(items) => {
                if items.iter().all(|item| scalar_text(item).is_some()) {
                    let values: String = items
                        .iter()
                        .filter_map(scalar_text)
                        .map(|v| format!(" {}", quote(&v)))
                        .collect();
                    lines.push(format!("{}=({} )", prefix, values));
                    continue;
                }

                let children: Vec<(String, &Value)> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let key = entry_name(item).unwrap_or_else(|| i.to_string());
                        (child_prefix(&prefix, &key), item)
                    })
                    .collect();
                lines.push(header(&prefix, &children));
                stack.extend(children.into_iter().rev());
            }
            Value::Mapping(map) => {
                let name = if prefix.is_empty() { "_" } else { prefix.as_str() };
                let mut children: Vec<(String, &Value)> = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let key = scalar_text(key)
                        .ok_or_else(|| ShellError::UnsupportedKey(name.to_string()))?;
                    children.push((child_prefix(&prefix, &key), value));
                }
                lines.push(header(name, &children));
                stack.extend(children.into_iter().rev());
            }
            scalar => {
                if let Some(text) = scalar_text(scalar) {
                    lines.push(format!("{}={}", prefix, quote(&text)));
                }
            }
        }
    }

    Ok(lines)
}

fn child_prefix(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", prefix, key)
    }
}

fn header(name: &str, children: &[(String, &Value)]) -> String {
    let names: String = children.iter().map(|(p, _)| format!(" {}", quote(p))).collect();
    format!("{}=({} )", name, names)
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn renders_nested_tree_in_preorder() {
        let tree = yaml(
            "a: 1\nb: {c: x}\nl: [p, q]\nn: [{name: root, size: 2}]\n",
        );

        assert_eq!(
            render_shell_vars(&tree).unwrap(),
            vec![
                "_=( 'a' 'b' 'l' 'n' )",
                "a='1'",
                "b=( 'b_c' )",
                "b_c='x'",
                "l=( 'p' 'q' )",
                "n=( 'n_root' )",
                "n_root=( 'n_root_name' 'n_root_size' )",
                "n_root_name='root'",
                "n_root_size='2'",
            ]
        );
    }

    #[test]
    fn unnamed_sequence_elements_use_index() {
        let tree = yaml("m: [{k: v}, [1]]\n");

        assert_eq!(
            render_shell_vars(&tree).unwrap(),
            vec![
                "_=( 'm' )",
                "m=( 'm_0' 'm_1' )",
                "m_0=( 'm_0_k' )",
                "m_0_k='v'",
                "m_1=( '1' )",
            ]
        );
    }

    #[test]
    fn nulls_are_silent_and_quotes_escaped() {
        let tree = yaml("gone: ~\nmotd: \"it's up\"\nempty: []\n");

        assert_eq!(
            render_shell_vars(&tree).unwrap(),
            vec![
                "_=( 'gone' 'motd' 'empty' )",
                "motd='it'\\''s up'",
                "empty=( )",
            ]
        );
    }

    #[test]
    fn empty_tree() {
        assert_eq!(render_shell_vars(&yaml("{}")).unwrap(), vec!["_=( )"]);
    }

    #[test]
    fn non_scalar_key_is_rejected() {
        let tree = yaml("matrix:\n  ? [a, b]\n  : 1\n");

        assert_eq!(
            render_shell_vars(&tree),
            Err(ShellError::UnsupportedKey("matrix".to_string()))
        );
    }
}
