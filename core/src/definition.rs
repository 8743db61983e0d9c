//! Declarative command tree definitions.
//!
//! A [`TreeDefinition`] describes a command tree as data so it can be kept in
//! a YAML or JSON file. Definitions carry no execution logic; attach it to
//! the converted [`CommandNode`]s afterwards if needed.
//!
//! ```yaml
//! name: todo
//! short_help: manage a todo list
//! options:
//!   - name: verbose
//!     kind: bool
//!     usage: enable verbose mode
//! commands:
//!   - name: add
//!     options:
//!       - name: priority
//!         kind: int
//!         default: 1
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{OptionDef, OptionKind, OptionValue};
use crate::types::CommandNode;

/// Errors raised while loading or converting a [`TreeDefinition`].
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A default value does not fit the declared kind.
    #[error("option -{option} in command {command:?} is declared {kind} but has a {found} default")]
    KindMismatch {
        command: String,
        option: String,
        kind: OptionKind,
        found: OptionKind,
    },
}

/// Declarative form of a single option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub name: String,
    pub kind: OptionKind,
    /// Defaults to the kind's zero value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<OptionValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,
}

impl OptionDefinition {
    fn into_def(self, command: &str) -> Result<OptionDef, DefinitionError> {
        let default = match (self.kind, self.default) {
            (OptionKind::Bool, None) => OptionValue::Bool(false),
            (OptionKind::String, None) => OptionValue::String(String::new()),
            (OptionKind::Int, None) => OptionValue::Int(0),
            (OptionKind::Float, None) => OptionValue::Float(0.0),
            // A whole-number literal is a valid float default.
            (OptionKind::Float, Some(OptionValue::Int(n))) => OptionValue::Float(n as f64),
            // Unquoted scalars like `8080` are fine for string options.
            (OptionKind::String, Some(value)) => OptionValue::String(value.to_string()),
            (kind, Some(value)) if value.kind() == kind => value,
            (kind, Some(value)) => {
                return Err(DefinitionError::KindMismatch {
                    command: command.to_string(),
                    option: self.name,
                    kind,
                    found: value.kind(),
                });
            }
        };
        Ok(OptionDef {
            name: self.name,
            usage: self.usage,
            default,
        })
    }
}

/// Declarative form of a command and its subcommands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_help: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
    /// Names of required options, declared here or on an ancestor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<TreeDefinition>,
}

impl TreeDefinition {
    pub fn from_yaml_str(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Converts the definition into a [`CommandNode`] tree.
    ///
    /// Only option defaults are checked here. Structural rules such as
    /// unique sibling names are enforced by
    /// [`validate_tree`](crate::validate_tree) and by every resolution.
    ///
    /// # Examples
    ///
    /// ```
    /// use subcommander_core::*;
    ///
    /// let def = TreeDefinition::from_yaml_str(
    ///     "name: todo\ncommands:\n  - name: add\n    options:\n      - name: priority\n        kind: int\n        default: 2\n",
    /// )
    /// .unwrap();
    /// let root = def.into_node().unwrap();
    ///
    /// let add = root.find_child("add").unwrap();
    /// assert_eq!(add.options.lookup("priority").unwrap().default, OptionValue::Int(2));
    /// ```
    pub fn into_node(self) -> Result<CommandNode, DefinitionError> {
        let mut node = CommandNode {
            usage: self.usage,
            short_help: self.short_help,
            required: self.required,
            ..CommandNode::new(&self.name)
        };
        for option in self.options {
            node.options.insert(option.into_def(&self.name)?);
        }
        for child in self.commands {
            node.children.push(child.into_node()?);
        }
        Ok(node)
    }
}
