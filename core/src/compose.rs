//! Option-set composition along a command path.
//!
//! [`MergedOptions::compose`] visits a resolved path from root to terminal and
//! registers every node's option definitions. When the same name is declared
//! at two levels, the deeper (more specific) definition shadows the ancestor's
//! and takes over its slot in the ordering. Sibling subtrees are never
//! visited, so their options are never visible.
//!
//! # Example
//!
//! ```
//! use subcommander_core::*;
//!
//! let root = CommandNode::new("todo")
//!     .with_option(OptionDef::bool("verbose", false))
//!     .with_option(OptionDef::string("format", "text"))
//!     .with_child(CommandNode::new("add").with_option(OptionDef::int("format", 1)));
//! let add = root.find_child("add").unwrap();
//!
//! let merged = MergedOptions::compose(&[&root, add]);
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged.lookup("format").unwrap().depth, 1);
//! assert_eq!(merged.lookup("format").unwrap().def.kind(), OptionKind::Int);
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::options::OptionDef;
use crate::types::CommandNode;

/// A definition in the merged set plus the path depth that declared it.
#[derive(Debug, Clone, Copy)]
pub struct MergedEntry<'t> {
    /// Index into the resolved path (0 is the root).
    pub depth: usize,
    pub def: &'t OptionDef,
}

/// Ordered union of option definitions visible to a path's terminal node.
#[derive(Debug, Clone, Default)]
pub struct MergedOptions<'t> {
    entries: Vec<MergedEntry<'t>>,
    index: HashMap<&'t str, usize>,
}

impl<'t> MergedOptions<'t> {
    /// Builds the merged set for `path` (root first).
    pub fn compose(path: &[&'t CommandNode]) -> Self {
        let mut merged = Self::default();
        for (depth, node) in path.iter().enumerate() {
            for def in &node.options {
                merged.register(depth, def, node);
            }
        }
        merged
    }

    fn register(&mut self, depth: usize, def: &'t OptionDef, node: &CommandNode) {
        let entry = MergedEntry { depth, def };
        match self.index.get(def.name.as_str()) {
            Some(&slot) => {
                trace!(
                    option = %def.name,
                    command = %node.name,
                    shadowed_depth = self.entries[slot].depth,
                    "Option shadows ancestor definition"
                );
                self.entries[slot] = entry;
            }
            None => {
                self.index.insert(def.name.as_str(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Finds the winning definition for `name`.
    pub fn lookup(&self, name: &str) -> Option<&MergedEntry<'t>> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in registration order, root options first.
    pub fn iter(&self) -> impl Iterator<Item = &MergedEntry<'t>> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'t str> {
        self.entries.iter().map(|e| e.def.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::OptionDef;

    use super::*;

    fn tree() -> CommandNode {
        CommandNode::new("todo")
            .with_option(OptionDef::bool("verbose", false))
            .with_option(OptionDef::bool("version", false))
            .with_child(CommandNode::new("add").with_option(OptionDef::bool("dry-run", false)))
            .with_child(
                CommandNode::new("nested")
                    .with_option(OptionDef::bool("force", false))
                    .with_child(
                        CommandNode::new("sub")
                            .with_option(OptionDef::string("echo", ""))
                            .with_option(OptionDef::string("verbose", "loud")),
                    ),
            )
    }

    #[test]
    fn test_compose_root_only() {
        let root = tree();
        let merged = MergedOptions::compose(&[&root]);
        assert_eq!(merged.names(), vec!["verbose", "version"]);
        assert!(!merged.contains("dry-run"));
    }

    #[test]
    fn test_compose_excludes_siblings() {
        let root = tree();
        let nested = root.find_child("nested").unwrap();
        let sub = nested.find_child("sub").unwrap();

        let merged = MergedOptions::compose(&[&root, nested, sub]);
        assert!(merged.contains("force"));
        assert!(merged.contains("echo"));
        assert!(!merged.contains("dry-run"));
    }

    #[test]
    fn test_child_definition_shadows_ancestor_in_place() {
        let root = tree();
        let nested = root.find_child("nested").unwrap();
        let sub = nested.find_child("sub").unwrap();

        let merged = MergedOptions::compose(&[&root, nested, sub]);
        assert_eq!(merged.names(), vec!["verbose", "version", "force", "echo"]);

        let verbose = merged.lookup("verbose").unwrap();
        assert_eq!(verbose.depth, 2);
        assert!(!verbose.def.is_bool());
    }

    #[test]
    fn test_compose_empty_path() {
        let merged = MergedOptions::compose(&[]);
        assert!(merged.is_empty());
        assert!(merged.lookup("anything").is_none());
    }
}
