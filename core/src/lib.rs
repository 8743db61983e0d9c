//! Nested subcommand resolution with inherited options.
//!
//! This crate resolves a raw argument vector against a tree of commands:
//!
//! - [`CommandNode`]: one command with its options, required option names,
//!   children and optional execution logic.
//! - [`resolve`](resolve()): finds the command path named by the arguments,
//!   parses every option token against the options visible along that path
//!   and returns a [`Resolution`] (or an [`Outcome::Help`] request).
//! - [`Resolution`]: the resolved path, leftover arguments and typed option
//!   access via [`Resolution::get`], which looks from the selected command
//!   towards the root.
//! - [`suggest`]: similarity ranking used for "did you mean" hints.
//!
//! Options may appear anywhere in the argument vector, before or after
//! subcommand names and positional arguments. A child command may redeclare
//! an ancestor's option; the nearest declaration wins.
//!
//! The tree is never modified by resolution, so one tree can be shared and
//! resolved from several threads at once.
//!
//! # Example
//!
//! ```
//! use subcommander_core::*;
//!
//! let root = CommandNode::new("todo")
//!     .with_option(OptionDef::bool("verbose", false))
//!     .with_child(
//!         CommandNode::new("nested").with_child(
//!             CommandNode::new("sub").with_option(OptionDef::string("echo", "")),
//!         ),
//!     );
//!
//! let args = ["--verbose", "nested", "sub", "--echo", "hello", "--", "-x"];
//! let resolution = resolve(&root, &args).unwrap().into_resolution().unwrap();
//!
//! assert_eq!(resolution.command_path(), "todo nested sub");
//! assert!(resolution.get::<bool>("verbose"));
//! assert_eq!(resolution.get::<String>("echo"), "hello");
//! assert_eq!(resolution.args(), ["-x"]);
//!
//! let err = resolve(&root, &["nestd"]).unwrap_err();
//! assert_eq!(err.suggestions(), ["nested"]);
//! ```

mod compose;
mod definition;
mod error;
pub mod flagparse;
mod help;
mod options;
mod resolution;
mod resolve;
mod run;
mod suggest;
mod types;
mod validate;

pub use compose::{MergedEntry, MergedOptions};
pub use definition::{DefinitionError, OptionDefinition, TreeDefinition};
pub use error::ResolveError;
pub use flagparse::FlagError;
pub use help::{FlagEntry, HelpSummary, SubcommandEntry};
pub use options::{FromOptionValue, OptionDef, OptionKind, OptionSet, OptionValue, ValueError};
pub use resolution::{Resolution, ResolutionReport, ValueStore};
pub use resolve::{END_OF_OPTIONS, HELP_TOKENS, HelpRequest, Outcome, is_help_token, resolve};
pub use run::{Io, RunError, RunOutcome, ShowHelp, parse_and_run, run};
pub use suggest::{MAX_SUGGESTIONS, similarity, suggest};
pub use types::{CommandNode, ExecFn, ExecHandle, UsageFn, UsageHandle, command_path};
pub use validate::{StructuralError, validate_tree};
