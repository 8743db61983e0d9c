//! Command tree validation.
//!
//! Catches authoring mistakes in a [`CommandNode`] tree before any argument
//! is looked at: empty or multi-word names, sibling name collisions, duplicate
//! option names and required options that nothing declares. The first problem
//! found is reported; resolution never proceeds on an invalid tree.
//!
//! # Examples
//!
//! ```
//! use subcommander_core::*;
//!
//! let tree = CommandNode::new("todo").with_child(CommandNode::new("add"));
//! assert!(validate_tree(&tree).is_ok());
//!
//! let bad = CommandNode::new("todo").with_child(CommandNode::new("add item"));
//! assert!(matches!(
//!     validate_tree(&bad),
//!     Err(StructuralError::NameHasWhitespace { .. })
//! ));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::options::OptionSet;
use crate::types::CommandNode;

/// Structural problems in a command tree.
///
/// Paths are dotted, root name first (e.g. `todo.nested`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The root node has an empty name.
    #[error("root command has no name")]
    EmptyRootName,
    /// A subcommand has an empty name; `parent` is the path above it.
    #[error("subcommand in path \"{parent}\" has no name")]
    EmptyName { parent: String },
    /// A command name contains whitespace.
    #[error("command name \"{name}\" at \"{path}\" contains whitespace, must be a single word")]
    NameHasWhitespace { name: String, path: String },
    /// Two siblings share a name (case-insensitively).
    #[error("duplicate subcommand \"{name}\" in \"{parent}\"")]
    DuplicateCommand { name: String, parent: String },
    /// An option name is declared twice on the same node.
    #[error("duplicate flag -{name} in command \"{path}\"")]
    DuplicateOption { name: String, path: String },
    /// A required option is declared neither on the node nor on an ancestor.
    #[error("command \"{path}\": internal error: required flag -{name} not found in flag set")]
    UnregisteredRequired { name: String, path: String },
}

/// Validates an entire command tree.
///
/// # Errors
///
/// Returns the first [`StructuralError`] found in a depth-first walk.
///
/// # Examples
///
/// ```
/// use subcommander_core::*;
///
/// let tree = CommandNode::new("root").require("some-other-flag");
/// let err = validate_tree(&tree).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "command \"root\": internal error: required flag -some-other-flag not found in flag set"
/// );
/// ```
pub fn validate_tree(root: &CommandNode) -> Result<(), StructuralError> {
    if root.name.is_empty() {
        return Err(StructuralError::EmptyRootName);
    }
    let mut path = Vec::new();
    let mut visible = Vec::new();
    validate_node(root, &mut path, &mut visible)
}

fn validate_node<'t>(
    node: &'t CommandNode,
    path: &mut Vec<&'t str>,
    visible: &mut Vec<&'t OptionSet>,
) -> Result<(), StructuralError> {
    if node.name.is_empty() {
        return Err(StructuralError::EmptyName {
            parent: path.join("."),
        });
    }
    path.push(&node.name);
    if node.name.chars().any(char::is_whitespace) {
        return Err(StructuralError::NameHasWhitespace {
            name: node.name.clone(),
            path: path.join("."),
        });
    }

    let mut seen_options = HashSet::new();
    for def in &node.options {
        if !seen_options.insert(def.name.as_str()) {
            return Err(StructuralError::DuplicateOption {
                name: def.name.clone(),
                path: path.join("."),
            });
        }
    }

    visible.push(&node.options);
    for name in &node.required {
        if !visible.iter().any(|set| set.contains(name)) {
            return Err(StructuralError::UnregisteredRequired {
                name: name.clone(),
                path: path.join("."),
            });
        }
    }

    let mut seen_children = HashSet::new();
    for child in &node.children {
        if !seen_children.insert(child.name.to_lowercase()) {
            return Err(StructuralError::DuplicateCommand {
                name: child.name.clone(),
                parent: path.join("."),
            });
        }
        validate_node(child, path, visible)?;
    }

    visible.pop();
    path.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::OptionDef;

    use super::*;

    fn sample_tree() -> CommandNode {
        CommandNode::new("todo")
            .with_option(OptionDef::bool("verbose", false))
            .with_child(CommandNode::new("add"))
            .with_child(
                CommandNode::new("nested")
                    .with_child(CommandNode::new("sub").require("verbose")),
            )
    }

    #[test]
    fn test_accepts_valid_tree() {
        assert_eq!(validate_tree(&sample_tree()), Ok(()));
    }

    #[test]
    fn test_rejects_empty_root_name() {
        assert_eq!(
            validate_tree(&CommandNode::default()),
            Err(StructuralError::EmptyRootName)
        );
    }

    #[test]
    fn test_rejects_empty_nested_name() {
        let mut tree = sample_tree();
        tree.children[1].children[0].name = String::new();

        let err = validate_tree(&tree).unwrap_err();
        assert_eq!(
            err,
            StructuralError::EmptyName {
                parent: "todo.nested".to_string()
            }
        );
        assert_eq!(err.to_string(), "subcommand in path \"todo.nested\" has no name");
    }

    #[test]
    fn test_rejects_whitespace_in_name() {
        let tree = CommandNode::new("root").with_child(CommandNode::new("sub command"));

        let err = validate_tree(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "command name \"sub command\" at \"root.sub command\" contains whitespace, must be a single word"
        );

        let tabbed = CommandNode::new("ro\tot");
        assert!(matches!(
            validate_tree(&tabbed),
            Err(StructuralError::NameHasWhitespace { .. })
        ));
    }

    #[test]
    fn test_rejects_case_insensitive_sibling_collision() {
        let tree = CommandNode::new("root")
            .with_child(CommandNode::new("Add"))
            .with_child(CommandNode::new("add"));

        assert_eq!(
            validate_tree(&tree),
            Err(StructuralError::DuplicateCommand {
                name: "add".to_string(),
                parent: "root".to_string()
            })
        );
    }

    #[test]
    fn test_same_name_in_different_branches_is_fine() {
        let tree = CommandNode::new("root")
            .with_child(CommandNode::new("a").with_child(CommandNode::new("list")))
            .with_child(CommandNode::new("b").with_child(CommandNode::new("list")));

        assert!(validate_tree(&tree).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_option() {
        let tree = CommandNode::new("root").with_child(
            CommandNode::new("add")
                .with_option(OptionDef::bool("force", false))
                .with_option(OptionDef::string("force", "")),
        );

        assert_eq!(
            validate_tree(&tree),
            Err(StructuralError::DuplicateOption {
                name: "force".to_string(),
                path: "root.add".to_string()
            })
        );
    }

    #[test]
    fn test_required_option_must_be_visible_from_node() {
        // Declared on a sibling only: not visible.
        let tree = CommandNode::new("root")
            .with_child(CommandNode::new("a").with_option(OptionDef::string("token", "")))
            .with_child(CommandNode::new("b").require("token"));

        assert_eq!(
            validate_tree(&tree),
            Err(StructuralError::UnregisteredRequired {
                name: "token".to_string(),
                path: "root.b".to_string()
            })
        );
    }
}
