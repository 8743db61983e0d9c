//! Command tree model.
//!
//! A tree is built once by the caller out of [`CommandNode`] values and is
//! never mutated by resolution. Parsed option values live in the per-call
//! [`Resolution`](crate::Resolution), so one tree can serve any number of
//! resolutions, including concurrent ones.

use std::fmt;
use std::sync::Arc;

use crate::options::{OptionDef, OptionSet};
use crate::resolution::Resolution;
use crate::run::Io;

/// Signature of a command's execution logic.
pub type ExecFn = dyn Fn(&Resolution<'_>, &mut Io<'_>) -> anyhow::Result<()> + Send + Sync;

/// Opaque, cheaply clonable reference to a command's execution logic.
///
/// The resolver only checks whether a handle is present; it is invoked by
/// [`run`](crate::run()).
#[derive(Clone)]
pub struct ExecHandle(Arc<ExecFn>);

impl ExecHandle {
    /// Wraps a closure or function as execution logic.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Resolution<'_>, &mut Io<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, resolution: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
        (self.0)(resolution, io)
    }
}

impl fmt::Debug for ExecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExecHandle(..)")
    }
}

/// Signature of a custom usage generator.
pub type UsageFn = dyn Fn(&CommandNode) -> String + Send + Sync;

/// Reference to a function that builds a command's usage line from the node
/// itself. Takes precedence over [`CommandNode::usage`] in
/// [`HelpSummary`](crate::HelpSummary).
#[derive(Clone)]
pub struct UsageHandle(Arc<UsageFn>);

impl UsageHandle {
    /// Wraps a closure or function as a usage generator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CommandNode) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, node: &CommandNode) -> String {
        (self.0)(node)
    }
}

impl fmt::Debug for UsageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UsageHandle(..)")
    }
}

/// One command or subcommand in a command tree.
///
/// # Examples
///
/// ```
/// use subcommander_core::{CommandNode, OptionDef};
///
/// let root = CommandNode::new("todo")
///     .with_option(OptionDef::bool("verbose", false).with_usage("enable verbose mode"))
///     .with_child(
///         CommandNode::new("add")
///             .with_option(OptionDef::bool("dry-run", false))
///             .with_exec(|_, _| Ok(())),
///     );
///
/// assert_eq!(root.find_child("ADD").unwrap().name, "add");
/// assert!(root.find_child("remove").is_none());
/// assert!(root.exec.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandNode {
    /// Single-word command name, matched case-insensitively.
    pub name: String,
    /// Full usage pattern, e.g. `todo add [flags] <item>...`.
    pub usage: Option<String>,
    /// Custom usage generator; wins over `usage` when set.
    pub usage_fn: Option<UsageHandle>,
    /// Brief description of the command's purpose.
    pub short_help: Option<String>,
    /// Options declared on this node.
    pub options: OptionSet,
    /// Names of options that must be supplied when this node is on the
    /// resolved path.
    pub required: Vec<String>,
    /// Nested subcommands.
    pub children: Vec<CommandNode>,
    /// Execution logic; `None` for pure grouping commands.
    pub exec: Option<ExecHandle>,
}

impl CommandNode {
    /// Creates a command with no options, children or execution logic.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the full usage pattern shown in help.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Sets a function that generates the usage line from this node.
    ///
    /// ```
    /// use subcommander_core::{CommandNode, HelpSummary};
    ///
    /// let root = CommandNode::new("serve").with_usage_fn(|node| format!("{} <addr>", node.name));
    /// assert_eq!(HelpSummary::for_path(&[&root]).usage, "serve <addr>");
    /// ```
    pub fn with_usage_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandNode) -> String + Send + Sync + 'static,
    {
        self.usage_fn = Some(UsageHandle::new(f));
        self
    }

    /// Sets the one-line description listed under "Available Commands".
    pub fn with_short_help(mut self, help: &str) -> Self {
        self.short_help = Some(help.to_string());
        self
    }

    /// Declares an option on this node.
    pub fn with_option(mut self, def: OptionDef) -> Self {
        self.options.insert(def);
        self
    }

    /// Marks an option name as required. The option itself may be declared
    /// on this node or on any ancestor.
    pub fn require(mut self, name: &str) -> Self {
        self.required.push(name.to_string());
        self
    }

    /// Appends a nested subcommand.
    pub fn with_child(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attaches execution logic, run by [`run`](crate::run()) when this node
    /// is the terminal of a resolution.
    pub fn with_exec<F>(mut self, f: F) -> Self
    where
        F: Fn(&Resolution<'_>, &mut Io<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.exec = Some(ExecHandle::new(f));
        self
    }

    /// Finds a direct child by name, ignoring case.
    pub fn find_child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| names_match(&c.name, name))
    }

    /// Names of the direct children, in declaration order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether this node groups any subcommands.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Case-insensitive command name comparison.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Joins node names with single spaces, e.g. `todo nested sub`.
pub fn command_path(nodes: &[&CommandNode]) -> String {
    nodes
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
