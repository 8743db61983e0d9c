//! Error types for command resolution.
//!
//! Everything a user can cause by typing the wrong arguments, plus structural
//! problems in the tree itself, is a [`ResolveError`]. Asking for help is not
//! an error; see [`Outcome::Help`](crate::Outcome::Help). Programmer errors in
//! option lookups panic instead, see [`Resolution::get`](crate::Resolution::get).

use thiserror::Error;

use crate::flagparse::FlagError;
use crate::validate::StructuralError;

/// Errors returned by [`resolve`](crate::resolve()).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The command tree is malformed.
    #[error("invalid command tree: {0}")]
    Structural(#[from] StructuralError),

    /// A positional token did not match any child of a command that has
    /// children.
    #[error("unknown command {name:?}{}", did_you_mean(.suggestions))]
    UnknownCommand {
        name: String,
        suggestions: Vec<String>,
    },

    /// An option token names an option not visible to the terminal command.
    #[error("error in command {command:?}: flag provided but not defined: {flag}")]
    UnknownFlag { command: String, flag: String },

    /// An option value failed to parse, or an option token was malformed.
    #[error("error in command {command:?}: {source}")]
    Flag {
        command: String,
        #[source]
        source: FlagError,
    },

    /// One or more required options still hold their default value.
    #[error("command {command:?}: required flags \"{}\" not set", dash_list(.flags))]
    MissingRequired { command: String, flags: Vec<String> },

    /// The resolved terminal command has no execution handle.
    #[error("command {command:?} has no execution function")]
    NoExec { command: String },
}

impl ResolveError {
    /// Suggestions carried by an unknown-command error, empty otherwise.
    pub fn suggestions(&self) -> &[String] {
        match self {
            ResolveError::UnknownCommand { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean one of these?\n\t{}", suggestions.join("\n\t"))
    }
}

fn dash_list(flags: &[String]) -> String {
    flags
        .iter()
        .map(|f| format!("-{f}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for results with [`ResolveError`].
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_message() {
        let err = ResolveError::UnknownCommand {
            name: "verzion".to_string(),
            suggestions: vec!["version".to_string(), "vendor".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown command \"verzion\". Did you mean one of these?\n\tversion\n\tvendor"
        );
        assert_eq!(err.suggestions().len(), 2);

        let bare = ResolveError::UnknownCommand {
            name: "zzz".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(bare.to_string(), "unknown command \"zzz\"");
    }

    #[test]
    fn test_missing_required_message() {
        let err = ResolveError::MissingRequired {
            command: "todo nested hello".to_string(),
            flags: vec![
                "mandatory-flag".to_string(),
                "another-mandatory-flag".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "command \"todo nested hello\": required flags \"-mandatory-flag, -another-mandatory-flag\" not set"
        );
    }

    #[test]
    fn test_structural_wraps_message() {
        let err: ResolveError = StructuralError::EmptyRootName.into();
        assert_eq!(err.to_string(), "invalid command tree: root command has no name");
    }
}
