//! Help data for renderers.
//!
//! The core does not lay out help text. It collects what a renderer needs
//! for one command on a resolved path: the usage line, sorted subcommands and
//! the options visible at that command, split into the command's own options
//! and those inherited from ancestors.

use serde::Serialize;

use crate::compose::{MergedEntry, MergedOptions};
use crate::options::{OptionKind, OptionValue};
use crate::types::{CommandNode, command_path};

/// A subcommand listed under "Available Commands".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcommandEntry {
    pub name: String,
    pub short_help: Option<String>,
}

/// An option visible at the described command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagEntry {
    /// Display name with a leading dash, e.g. `-verbose`.
    pub name: String,
    pub kind: OptionKind,
    pub usage: String,
    pub default: OptionValue,
}

/// Everything a help renderer needs for one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelpSummary {
    /// Space-joined command path, e.g. `todo nested`.
    pub command: String,
    pub usage: String,
    pub short_help: Option<String>,
    /// Sorted by name.
    pub subcommands: Vec<SubcommandEntry>,
    /// Options declared on the command itself, sorted by name.
    pub flags: Vec<FlagEntry>,
    /// Options inherited from ancestors, sorted by name.
    pub global_flags: Vec<FlagEntry>,
}

impl HelpSummary {
    /// Describes the last node of `path` (root first).
    ///
    /// The usage line comes from the node's usage hook if it has one, then
    /// from its explicit usage pattern, and is otherwise generated from the
    /// command path.
    ///
    /// # Examples
    ///
    /// ```
    /// use subcommander_core::*;
    ///
    /// let root = CommandNode::new("todo")
    ///     .with_option(OptionDef::bool("verbose", false))
    ///     .with_child(CommandNode::new("list"))
    ///     .with_child(CommandNode::new("add").with_short_help("add an item"));
    ///
    /// let help = HelpSummary::for_path(&[&root]);
    /// assert_eq!(help.usage, "todo [flags] <command>");
    /// assert_eq!(help.subcommands[0].name, "add");
    /// assert_eq!(help.flags[0].name, "-verbose");
    /// ```
    pub fn for_path(path: &[&CommandNode]) -> Self {
        let Some(terminal) = path.last() else {
            return Self::empty();
        };
        let depth = path.len() - 1;
        let merged = MergedOptions::compose(path);
        let command = command_path(path);

        let usage = match (&terminal.usage_fn, &terminal.usage) {
            (Some(usage_fn), _) => usage_fn.call(terminal),
            (None, Some(usage)) => usage.clone(),
            (None, None) => {
                let mut usage = command.clone();
                if !merged.is_empty() {
                    usage.push_str(" [flags]");
                }
                if terminal.has_children() {
                    usage.push_str(" <command>");
                }
                usage
            }
        };

        let mut subcommands: Vec<SubcommandEntry> = terminal
            .children
            .iter()
            .map(|c| SubcommandEntry {
                name: c.name.clone(),
                short_help: c.short_help.clone(),
            })
            .collect();
        subcommands.sort_by(|a, b| a.name.cmp(&b.name));

        let (mut flags, mut global_flags): (Vec<&MergedEntry<'_>>, Vec<&MergedEntry<'_>>) =
            merged.iter().partition(|e| e.depth == depth);
        flags.sort_by(|a, b| a.def.name.cmp(&b.def.name));
        global_flags.sort_by(|a, b| a.def.name.cmp(&b.def.name));

        Self {
            command,
            usage,
            short_help: terminal.short_help.clone(),
            subcommands,
            flags: flags.into_iter().map(flag_entry).collect(),
            global_flags: global_flags.into_iter().map(flag_entry).collect(),
        }
    }

    fn empty() -> Self {
        Self {
            command: String::new(),
            usage: String::new(),
            short_help: None,
            subcommands: Vec::new(),
            flags: Vec::new(),
            global_flags: Vec::new(),
        }
    }
}

fn flag_entry(entry: &MergedEntry<'_>) -> FlagEntry {
    FlagEntry {
        name: format!("-{}", entry.def.name),
        kind: entry.def.kind(),
        usage: entry.def.usage.clone(),
        default: entry.def.default.clone(),
    }
}
