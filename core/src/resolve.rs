//! Argument resolution against a command tree.
//!
//! [`resolve`] runs four phases over the raw arguments:
//!
//! 1. Split at the first `--`. Everything after it is passed through as
//!    leftover arguments and never interpreted.
//! 2. Walk the tree, treating non-option tokens that name a child of the
//!    current command as subcommands. Option tokens are skipped here.
//! 3. Merge the option-sets along the path and parse every option token in
//!    the pre-split arguments, wherever it appears.
//! 4. Check required options and rebuild the leftover arguments.
//!
//! # Example
//!
//! ```
//! use subcommander_core::*;
//!
//! let root = CommandNode::new("todo")
//!     .with_option(OptionDef::bool("verbose", false))
//!     .with_child(CommandNode::new("add").with_option(OptionDef::bool("dry-run", false)));
//!
//! let outcome = resolve(&root, &["add", "item1", "--dry-run", "item2", "--verbose"]).unwrap();
//! let resolution = outcome.into_resolution().unwrap();
//!
//! assert_eq!(resolution.terminal().name, "add");
//! assert!(resolution.get::<bool>("dry-run"));
//! assert!(resolution.get::<bool>("verbose"));
//! assert_eq!(resolution.args(), ["item1", "item2"]);
//! ```

use tracing::{debug, trace};

use crate::compose::MergedOptions;
use crate::error::{ResolveError, Result};
use crate::flagparse::{self, FlagError, is_option_like};
use crate::help::HelpSummary;
use crate::resolution::{Resolution, ValueStore};
use crate::suggest::{MAX_SUGGESTIONS, suggest};
use crate::types::{CommandNode, command_path, names_match};
use crate::validate::{StructuralError, validate_tree};

/// Standalone tokens that request help.
pub const HELP_TOKENS: [&str; 4] = ["-h", "--h", "-help", "--help"];

/// Token that ends command and option interpretation.
pub const END_OF_OPTIONS: &str = "--";

/// Whether `token` is exactly one of the [`HELP_TOKENS`].
pub fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}

/// Successful result of [`resolve`].
#[derive(Debug, Clone)]
pub enum Outcome<'t> {
    /// A command was selected and its options parsed.
    Resolved(Resolution<'t>),
    /// A help token was found; carries the path resolved up to that point.
    Help(HelpRequest<'t>),
}

impl<'t> Outcome<'t> {
    pub fn into_resolution(self) -> Option<Resolution<'t>> {
        match self {
            Outcome::Resolved(resolution) => Some(resolution),
            Outcome::Help(_) => None,
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Outcome::Help(_))
    }
}

/// Help was requested for the command at the end of `path`.
#[derive(Debug, Clone)]
pub struct HelpRequest<'t> {
    path: Vec<&'t CommandNode>,
}

impl<'t> HelpRequest<'t> {
    pub fn path(&self) -> &[&'t CommandNode] {
        &self.path
    }

    /// The command whose help should be shown.
    pub fn command(&self) -> &'t CommandNode {
        self.path[self.path.len() - 1]
    }

    pub fn command_path(&self) -> String {
        command_path(&self.path)
    }

    pub fn summary(&self) -> HelpSummary {
        HelpSummary::for_path(&self.path)
    }
}

enum Discovery<'t> {
    Path(Vec<&'t CommandNode>),
    Help(Vec<&'t CommandNode>),
}

/// Resolves `args` (without the program name) against the tree at `root`.
///
/// The tree is validated first and is never modified. Parsed values are kept
/// in the returned [`Resolution`], so resolving concurrently against one
/// shared tree is safe.
///
/// # Errors
///
/// - [`ResolveError::Structural`] if the tree is invalid.
/// - [`ResolveError::UnknownCommand`] if a positional token does not name a
///   child of a command that has children.
/// - [`ResolveError::UnknownFlag`] / [`ResolveError::Flag`] for option tokens
///   that are undefined, malformed or carry unparseable values.
/// - [`ResolveError::MissingRequired`] listing every required option that
///   still holds its default value.
///
/// Required options are checked by comparing against the declared default:
/// a required option explicitly set to its default value is reported as
/// missing.
///
/// Leftover arguments are what remains after option parsing, minus the
/// tokens that named subcommands. Those are matched one for one, in path
/// order and ignoring case, against the path below the root. Stripping stops
/// at the first token that does not name the next command, so a positional
/// equal to a command name is kept: `todo add add x` leaves `["add", "x"]`,
/// and `todo add todo x` leaves `["todo", "x"]`. The root's name is never
/// stripped.
pub fn resolve<'t, S: AsRef<str>>(root: &'t CommandNode, args: &[S]) -> Result<Outcome<'t>> {
    validate_tree(root)?;

    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    debug!(command = %root.name, args = ?args, "Resolving arguments");

    let (main, tail) = split_at_terminator(&args);

    let path = match discover_path(root, main)? {
        Discovery::Path(path) => path,
        Discovery::Help(path) => {
            debug!(command = %command_path(&path), "Help requested");
            return Ok(Outcome::Help(HelpRequest { path }));
        }
    };
    let terminal = path[path.len() - 1];

    let merged = MergedOptions::compose(&path);
    let parsed = flagparse::parse_to_end(main, |name| merged.lookup(name).map(|e| e.def))
        .map_err(|err| match err {
            FlagError::NotDefined(flag) => ResolveError::UnknownFlag {
                command: terminal.name.clone(),
                flag,
            },
            source => ResolveError::Flag {
                command: terminal.name.clone(),
                source,
            },
        })?;

    let mut values = ValueStore::default();
    for (name, value) in parsed.assignments {
        if let Some(entry) = merged.lookup(&name) {
            trace!(option = %name, value = %value, depth = entry.depth, "Parsed option");
            values.set(entry.depth, &name, value);
        }
    }

    check_required(&path, &merged, &values)?;

    let mut leftover = strip_command_tokens(parsed.remaining, &path);
    leftover.extend(tail.iter().cloned());

    debug!(
        command = %command_path(&path),
        options = values.len(),
        args = leftover.len(),
        "Resolved command"
    );
    Ok(Outcome::Resolved(Resolution::new(path, leftover, values)))
}

fn split_at_terminator(args: &[String]) -> (&[String], &[String]) {
    match args.iter().position(|a| a == END_OF_OPTIONS) {
        Some(k) => (&args[..k], &args[k + 1..]),
        None => (args, &[]),
    }
}

fn discover_path<'t>(root: &'t CommandNode, main: &[String]) -> Result<Discovery<'t>> {
    let mut path = vec![root];
    let mut current = root;
    let mut tokens = main.iter();

    for token in tokens.by_ref() {
        if is_help_token(token) {
            return Ok(Discovery::Help(path));
        }
        if is_option_like(token) {
            continue;
        }
        match current.find_child(token) {
            Some(child) => {
                trace!(command = %child.name, "Descending into subcommand");
                path.push(child);
                current = child;
            }
            None if current.has_children() => {
                let suggestions = suggest(token, &current.child_names(), MAX_SUGGESTIONS);
                return Err(ResolveError::UnknownCommand {
                    name: token.clone(),
                    suggestions,
                });
            }
            None => break,
        }
    }

    // Command discovery is over, but a help token later in the stream still
    // counts.
    if tokens.any(|t| is_help_token(t)) {
        return Ok(Discovery::Help(path));
    }
    Ok(Discovery::Path(path))
}

fn check_required(
    path: &[&CommandNode],
    merged: &MergedOptions<'_>,
    values: &ValueStore,
) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();

    for node in path {
        for name in &node.required {
            let Some(entry) = merged.lookup(name) else {
                let dotted = path
                    .iter()
                    .map(|n| n.name.as_str())
                    .collect::<Vec<_>>()
                    .join(".");
                return Err(StructuralError::UnregisteredRequired {
                    name: name.clone(),
                    path: dotted,
                }
                .into());
            };
            let current = values.get(entry.depth, name).unwrap_or(&entry.def.default);
            if *current == entry.def.default && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::MissingRequired {
            command: command_path(path),
            flags: missing,
        })
    }
}

/// Drops the leading tokens that were consumed as subcommand names.
fn strip_command_tokens(mut remaining: Vec<String>, path: &[&CommandNode]) -> Vec<String> {
    let consumed = remaining
        .iter()
        .zip(path.iter().skip(1))
        .take_while(|(token, node)| names_match(&node.name, token))
        .count();
    remaining.split_off(consumed)
}

#[cfg(test)]
mod tests {
    use crate::OptionDef;

    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_at_first_terminator() {
        let args = strings(&["a", "--", "b", "--", "c"]);
        let (main, tail) = split_at_terminator(&args);
        assert_eq!(main, ["a"]);
        assert_eq!(tail, ["b", "--", "c"]);

        let args = strings(&["a", "b"]);
        let (main, tail) = split_at_terminator(&args);
        assert_eq!(main.len(), 2);
        assert!(tail.is_empty());
    }

    #[test]
    fn test_help_tokens_are_exact() {
        for token in ["-h", "--h", "-help", "--help"] {
            assert!(is_help_token(token));
        }
        for token in ["-H", "--help=true", "help", "-hh"] {
            assert!(!is_help_token(token));
        }
    }

    #[test]
    fn test_strip_command_tokens_follows_path_order() {
        let root = CommandNode::new("todo")
            .with_child(CommandNode::new("add"));
        let add = root.find_child("add").unwrap();
        let path = [&root, add];

        assert_eq!(
            strip_command_tokens(strings(&["ADD", "add", "x"]), &path),
            vec!["add", "x"]
        );
        assert_eq!(
            strip_command_tokens(strings(&["x", "add"]), &path),
            vec!["x", "add"]
        );
        assert!(strip_command_tokens(strings(&["add"]), &path).is_empty());
    }

    #[test]
    fn test_required_duplicates_reported_once() {
        let root = CommandNode::new("app")
            .with_option(OptionDef::string("token", ""))
            .require("token")
            .with_child(CommandNode::new("push").require("token"));

        let err = resolve(&root, &["push"]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingRequired {
                command: "app push".to_string(),
                flags: vec!["token".to_string()],
            }
        );
    }
}
