//! Executing a resolved command.
//!
//! The resolver never runs anything. This layer takes a [`Resolution`],
//! hands the terminal's execution logic the injected I/O streams and reports
//! what happened.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::debug;

use crate::error::ResolveError;
use crate::help::HelpSummary;
use crate::resolution::Resolution;
use crate::resolve::{Outcome, resolve};
use crate::types::CommandNode;

/// Standard streams made available to execution logic.
pub struct Io<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Io<'a> {
    /// Bundles the three streams.
    pub fn new(stdin: &'a mut dyn Read, stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

/// Error a handler returns to have the terminal command's help shown.
///
/// Any error in the chain counts, so it survives
/// [`anyhow::Context`] wrapping.
///
/// ```
/// use subcommander_core::{CommandNode, ShowHelp};
///
/// let root = CommandNode::new("echo").with_exec(|r, _| {
///     if r.args().is_empty() {
///         return Err(ShowHelp::new("no text provided").into());
///     }
///     Ok(())
/// });
/// # let _ = root;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ShowHelp {
    pub reason: String,
}

impl ShowHelp {
    /// Creates a help request; `reason` becomes the error message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from [`run`] and [`parse_and_run`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A non-root terminal command has no execution logic.
    #[error("command {command:?} has no execution function")]
    NoExec { command: String },

    /// The execution logic returned [`ShowHelp`]. The caller should print
    /// `help` along with the reason.
    #[error("{reason}")]
    HelpRequested {
        reason: String,
        help: Box<HelpSummary>,
    },

    /// The execution logic itself failed.
    #[error("command {command:?} failed: {source}")]
    Exec {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RunError {
    /// Help to print alongside the error, if the handler asked for it.
    pub fn help(&self) -> Option<&HelpSummary> {
        match self {
            RunError::HelpRequested { help, .. } => Some(help.as_ref()),
            _ => None,
        }
    }
}

/// What [`run`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The terminal command's execution logic ran to completion.
    Completed,
    /// Nothing was executed; the caller should show this help.
    Help(HelpSummary),
}

/// Runs the terminal command of `resolution`.
///
/// A root command without execution logic is treated as a request for help,
/// so a bare invocation of a grouping program shows its help instead of
/// failing.
///
/// # Errors
///
/// [`RunError::NoExec`] if a non-root terminal has no execution logic,
/// [`RunError::HelpRequested`] if the execution logic returns [`ShowHelp`],
/// and [`RunError::Exec`] for any other error it returns.
pub fn run(resolution: &Resolution<'_>, io: &mut Io<'_>) -> Result<RunOutcome, RunError> {
    let terminal = resolution.terminal();
    let Some(exec) = terminal.exec.as_ref() else {
        if resolution.path().len() == 1 {
            debug!(command = %terminal.name, "Root has no exec, showing help");
            return Ok(RunOutcome::Help(resolution.help()));
        }
        return Err(RunError::NoExec {
            command: resolution.command_path(),
        });
    };

    debug!(command = %resolution.command_path(), args = ?resolution.args(), "Running command");
    exec.call(resolution, io).map_err(|source| {
        let requested = source
            .chain()
            .find_map(|e| e.downcast_ref::<ShowHelp>())
            .map(|request| request.reason.clone());
        match requested {
            Some(reason) => {
                debug!(command = %resolution.command_path(), %reason, "Handler requested help");
                RunError::HelpRequested {
                    reason,
                    help: Box::new(resolution.help()),
                }
            }
            None => RunError::Exec {
                command: resolution.command_path(),
                source,
            },
        }
    })?;
    Ok(RunOutcome::Completed)
}

/// Resolves `args` against `root` and runs the result.
///
/// Help tokens produce [`RunOutcome::Help`] for the command they were found
/// under.
///
/// # Examples
///
/// ```
/// use subcommander_core::*;
///
/// let root = CommandNode::new("count").with_child(
///     CommandNode::new("version").with_exec(|_, io| {
///         writeln!(io.stdout, "1.0.0")?;
///         Ok(())
///     }),
/// );
///
/// let mut stdin = std::io::empty();
/// let mut stdout = Vec::new();
/// let mut stderr = Vec::new();
/// let mut io = Io::new(&mut stdin, &mut stdout, &mut stderr);
///
/// let outcome = parse_and_run(&root, &["version"], &mut io).unwrap();
/// assert_eq!(outcome, RunOutcome::Completed);
/// assert_eq!(String::from_utf8(stdout).unwrap(), "1.0.0\n");
/// ```
pub fn parse_and_run<S: AsRef<str>>(
    root: &CommandNode,
    args: &[S],
    io: &mut Io<'_>,
) -> Result<RunOutcome, RunError> {
    match resolve(root, args)? {
        Outcome::Resolved(resolution) => run(&resolution, io),
        Outcome::Help(request) => Ok(RunOutcome::Help(request.summary())),
    }
}
