//! Option token grammar.
//!
//! Accepted shapes are `-name`, `--name`, `-name=value`, `--name=value` and,
//! for non-boolean options, `-name value`. A lone `-` is an ordinary
//! positional token and `--` ends option processing.
//!
//! [`parse_to_end`] differs from a conventional flag parser in one way: it
//! does not stop at the first positional token. Positionals are set aside and
//! scanning continues, so options may appear anywhere in the stream.

use thiserror::Error;

use crate::options::{OptionDef, OptionValue, ValueError};

/// Errors produced while matching option tokens against definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The option name is not in the active set. Holds the token as typed,
    /// without any `=value` part.
    #[error("flag provided but not defined: {0}")]
    NotDefined(String),
    /// Malformed token such as `---x` or `-=x`.
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    /// A non-boolean option appeared last with no value.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),
    /// Boolean option given an unparseable `=value`.
    #[error("invalid boolean value {value:?} for -{name}: {source}")]
    InvalidBool {
        name: String,
        value: String,
        source: ValueError,
    },
    /// Non-boolean option given an unparseable value.
    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidValue {
        name: String,
        value: String,
        source: ValueError,
    },
}

/// Shape of a single raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// The end-of-options marker `--`.
    Terminator,
    /// Anything that is not option-shaped, including a lone `-`.
    Positional(&'a str),
    /// An option token with its name and optional `=value` part.
    Flag { name: &'a str, value: Option<&'a str> },
    /// Option-shaped but unusable, e.g. `---x`.
    Malformed(&'a str),
}

/// Classifies one raw token.
///
/// # Examples
///
/// ```
/// use subcommander_core::flagparse::{classify, Token};
///
/// assert_eq!(classify("--echo=hi"), Token::Flag { name: "echo", value: Some("hi") });
/// assert_eq!(classify("-v"), Token::Flag { name: "v", value: None });
/// assert_eq!(classify("-"), Token::Positional("-"));
/// assert_eq!(classify("--"), Token::Terminator);
/// assert_eq!(classify("---x"), Token::Malformed("---x"));
/// ```
pub fn classify(token: &str) -> Token<'_> {
    if token.len() < 2 || !token.starts_with('-') {
        return Token::Positional(token);
    }
    if token == "--" {
        return Token::Terminator;
    }
    let body = token
        .strip_prefix("--")
        .unwrap_or_else(|| &token[1..]);
    if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
        return Token::Malformed(token);
    }
    match body.split_once('=') {
        Some((name, value)) => Token::Flag {
            name,
            value: Some(value),
        },
        None => Token::Flag {
            name: body,
            value: None,
        },
    }
}

/// Whether a token has the option prefix.
pub fn is_option_like(token: &str) -> bool {
    token.starts_with('-')
}

/// Result of a parse-to-end pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTokens {
    /// `(option name, value)` in the order they were seen.
    pub assignments: Vec<(String, OptionValue)>,
    /// Tokens that were not consumed as options or option values.
    pub remaining: Vec<String>,
}

/// Parses every option token in `tokens`, skipping over positionals.
///
/// `lookup` maps an option name to its definition. Tokens after a `--` are
/// passed through into `remaining` untouched.
///
/// # Errors
///
/// Returns the first [`FlagError`] encountered; no partial result is kept.
///
/// # Examples
///
/// ```
/// use subcommander_core::{OptionDef, OptionValue};
/// use subcommander_core::flagparse::parse_to_end;
///
/// let defs = [OptionDef::bool("dry-run", false), OptionDef::string("echo", "")];
/// let lookup = |name: &str| defs.iter().find(|d| d.name == name);
/// let tokens: Vec<String> = ["item1", "--dry-run", "item2", "-echo", "hi"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// let parsed = parse_to_end(&tokens, lookup).unwrap();
/// assert_eq!(parsed.remaining, vec!["item1", "item2"]);
/// assert_eq!(parsed.assignments[0], ("dry-run".to_string(), OptionValue::Bool(true)));
/// assert_eq!(parsed.assignments[1], ("echo".to_string(), OptionValue::String("hi".into())));
/// ```
pub fn parse_to_end<'d, F>(tokens: &[String], lookup: F) -> Result<ParsedTokens, FlagError>
where
    F: Fn(&str) -> Option<&'d OptionDef>,
{
    let mut parsed = ParsedTokens::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        let (name, inline) = match classify(token) {
            Token::Positional(_) => {
                parsed.remaining.push(token.clone());
                continue;
            }
            Token::Terminator => {
                parsed.remaining.extend(iter.by_ref().cloned());
                break;
            }
            Token::Malformed(raw) => return Err(FlagError::BadSyntax(raw.to_string())),
            Token::Flag { name, value } => (name, value),
        };

        let Some(def) = lookup(name) else {
            let typed = token.split_once('=').map_or(token.as_str(), |(flag, _)| flag);
            return Err(FlagError::NotDefined(typed.to_string()));
        };

        let value = if def.is_bool() {
            match inline {
                Some(raw) => def.parse(raw).map_err(|source| FlagError::InvalidBool {
                    name: name.to_string(),
                    value: raw.to_string(),
                    source,
                })?,
                None => OptionValue::Bool(true),
            }
        } else {
            let raw = match inline {
                Some(raw) => raw,
                None => iter
                    .next()
                    .map(String::as_str)
                    .ok_or_else(|| FlagError::MissingValue(name.to_string()))?,
            };
            def.parse(raw).map_err(|source| FlagError::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
                source,
            })?
        };

        parsed.assignments.push((def.name.clone(), value));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn defs() -> Vec<OptionDef> {
        vec![
            OptionDef::bool("force", false),
            OptionDef::string("echo", ""),
            OptionDef::int("count", 0),
        ]
    }

    fn run(tokens: &[&str]) -> Result<ParsedTokens, FlagError> {
        let defs = defs();
        parse_to_end(&strings(tokens), |name| defs.iter().find(|d| d.name == name))
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(classify("a"), Token::Positional("a"));
        assert_eq!(classify(""), Token::Positional(""));
        assert_eq!(
            classify("-name=a=b"),
            Token::Flag {
                name: "name",
                value: Some("a=b")
            }
        );
        assert_eq!(
            classify("--name="),
            Token::Flag {
                name: "name",
                value: Some("")
            }
        );
        assert_eq!(classify("-=x"), Token::Malformed("-=x"));
        assert_eq!(classify("--=x"), Token::Malformed("--=x"));
    }

    #[test]
    fn test_parses_past_positionals() {
        let parsed = run(&["a", "--force", "b", "-count", "3", "c"]).unwrap();
        assert_eq!(parsed.remaining, vec!["a", "b", "c"]);
        assert_eq!(
            parsed.assignments,
            vec![
                ("force".to_string(), OptionValue::Bool(true)),
                ("count".to_string(), OptionValue::Int(3)),
            ]
        );
    }

    #[test]
    fn test_bool_never_consumes_next_token() {
        let parsed = run(&["--force", "false"]).unwrap();
        assert_eq!(parsed.remaining, vec!["false"]);
        assert_eq!(parsed.assignments[0].1, OptionValue::Bool(true));
    }

    #[test]
    fn test_value_option_consumes_dash_token() {
        let parsed = run(&["--echo", "-x"]).unwrap();
        assert!(parsed.remaining.is_empty());
        assert_eq!(parsed.assignments[0].1, OptionValue::String("-x".into()));
    }

    #[test]
    fn test_last_assignment_listed_last() {
        let parsed = run(&["--count=1", "--count=2"]).unwrap();
        assert_eq!(parsed.assignments.last().unwrap().1, OptionValue::Int(2));
    }

    #[test]
    fn test_terminator_passes_rest_through() {
        let parsed = run(&["a", "--", "--force", "b"]).unwrap();
        assert_eq!(parsed.remaining, vec!["a", "--force", "b"]);
        assert!(parsed.assignments.is_empty());
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let parsed = run(&["-", "--force"]).unwrap();
        assert_eq!(parsed.remaining, vec!["-"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            run(&["--unknown"]).unwrap_err().to_string(),
            "flag provided but not defined: --unknown"
        );
        assert_eq!(
            run(&["-unknown=1"]).unwrap_err(),
            FlagError::NotDefined("-unknown".to_string())
        );
        assert_eq!(
            run(&["--force=not-a-bool"]).unwrap_err().to_string(),
            "invalid boolean value \"not-a-bool\" for -force: parse error"
        );
        assert_eq!(
            run(&["-count", "many"]).unwrap_err().to_string(),
            "invalid value \"many\" for flag -count: parse error"
        );
        assert_eq!(
            run(&["x", "--echo"]).unwrap_err(),
            FlagError::MissingValue("echo".to_string())
        );
        assert_eq!(
            run(&["---force"]).unwrap_err(),
            FlagError::BadSyntax("---force".to_string())
        );
    }
}
