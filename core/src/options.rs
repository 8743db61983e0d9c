//! Option definitions and tagged option values.
//!
//! Every option declared on a [`CommandNode`](crate::CommandNode) carries a
//! [`OptionKind`] fixed at declaration time and a default [`OptionValue`] of
//! that kind. Lexical parsing of raw token text into a value happens here;
//! the token grammar itself lives in [`flagparse`](crate::flagparse).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared value kind of an option.
///
/// # Examples
///
/// ```
/// use subcommander_core::{OptionDef, OptionKind};
///
/// assert_eq!(OptionDef::bool("verbose", false).kind(), OptionKind::Bool);
/// assert_eq!(OptionDef::int("count", 0).kind(), OptionKind::Int);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Boolean switch; `-name` alone sets it to `true`.
    Bool,
    /// Arbitrary text.
    String,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
}

impl OptionKind {
    /// Name of the Rust type values of this kind are read as.
    pub fn type_name(self) -> &'static str {
        match self {
            OptionKind::Bool => bool::TYPE_NAME,
            OptionKind::String => String::TYPE_NAME,
            OptionKind::Int => i64::TYPE_NAME,
            OptionKind::Float => f64::TYPE_NAME,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionKind::Bool => "bool",
            OptionKind::String => "string",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
        };
        f.write_str(s)
    }
}

/// A parsed or default option value.
///
/// Serializes untagged, so `true`, `"text"`, `3` and `1.5` appear as plain
/// JSON/YAML scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    /// Returns the kind this value belongs to.
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::String(_) => OptionKind::String,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Float(_) => OptionKind::Float,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Int(n) => write!(f, "{n}"),
            OptionValue::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Lexical failure while converting raw text into an [`OptionValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("parse error")]
    Syntax,
    #[error("value out of range")]
    Range,
}

/// Definition of a single named, typed option.
///
/// # Examples
///
/// ```
/// use subcommander_core::{OptionDef, OptionValue};
///
/// let echo = OptionDef::string("echo", "").with_usage("echo the message");
/// assert_eq!(echo.name, "echo");
/// assert_eq!(echo.default, OptionValue::String(String::new()));
/// assert_eq!(echo.parse("hi").unwrap(), OptionValue::String("hi".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Option name without any leading dashes.
    pub name: String,
    /// One-line description shown in help data.
    #[serde(default)]
    pub usage: String,
    /// Default value; its variant fixes the option's kind.
    pub default: OptionValue,
}

impl OptionDef {
    fn new(name: &str, default: OptionValue) -> Self {
        Self {
            name: name.to_string(),
            usage: String::new(),
            default,
        }
    }

    /// Declares a boolean option.
    pub fn bool(name: &str, default: bool) -> Self {
        Self::new(name, OptionValue::Bool(default))
    }

    /// Declares a string option.
    pub fn string(name: &str, default: &str) -> Self {
        Self::new(name, OptionValue::String(default.to_string()))
    }

    /// Declares an integer option.
    pub fn int(name: &str, default: i64) -> Self {
        Self::new(name, OptionValue::Int(default))
    }

    /// Declares a float option.
    pub fn float(name: &str, default: f64) -> Self {
        Self::new(name, OptionValue::Float(default))
    }

    /// Adds a usage description.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Declared kind, taken from the default value.
    pub fn kind(&self) -> OptionKind {
        self.default.kind()
    }

    /// Whether `-name` alone is a complete option token.
    pub fn is_bool(&self) -> bool {
        self.kind() == OptionKind::Bool
    }

    /// Parses raw token text into a value of this option's kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Syntax`] when the text is not valid for the
    /// kind, and [`ValueError::Range`] when an integer overflows `i64`.
    pub fn parse(&self, raw: &str) -> Result<OptionValue, ValueError> {
        match self.kind() {
            OptionKind::Bool => parse_bool(raw).map(OptionValue::Bool),
            OptionKind::String => Ok(OptionValue::String(raw.to_string())),
            OptionKind::Int => parse_int(raw).map(OptionValue::Int),
            OptionKind::Float => raw
                .parse::<f64>()
                .map(OptionValue::Float)
                .map_err(|_| ValueError::Syntax),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::Syntax),
    }
}

/// Integers accept an optional sign and a radix prefix: `0x` for hex, `0o`
/// or a bare leading `0` for octal, `0b` for binary. `_` may separate digits,
/// or follow a prefix, so `1_000` and `0x_ff` are valid.
fn parse_int(raw: &str) -> Result<i64, ValueError> {
    let (negative, body) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, prefixed, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, true, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, true, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, true, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, true, &lower[1..])
    } else {
        (10, false, lower.as_str())
    };
    if !underscores_ok(digits, prefixed) {
        return Err(ValueError::Syntax);
    }
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ValueError::Syntax);
    }
    let magnitude = u64::from_str_radix(&digits, radix).map_err(|_| ValueError::Range)?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(ValueError::Range);
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| ValueError::Range)
    }
}

/// Each `_` must sit between two digits, or right after a radix prefix.
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    let bytes = digits.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        if b != b'_' {
            return true;
        }
        let after_digit = if i == 0 { prefixed } else { bytes[i - 1] != b'_' };
        let before_digit = bytes.get(i + 1).is_some_and(|&next| next != b'_');
        after_digit && before_digit
    })
}

/// Ordered set of option definitions local to one command node.
///
/// Names are expected to be unique; [`validate_tree`](crate::validate_tree)
/// reports duplicates as structural errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    defs: Vec<OptionDef>,
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition.
    pub fn insert(&mut self, def: OptionDef) {
        self.defs.push(def);
    }

    /// Finds a definition by exact name.
    pub fn lookup(&self, name: &str) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// Whether a definition with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionDef> {
        self.defs.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl FromIterator<OptionDef> for OptionSet {
    fn from_iter<I: IntoIterator<Item = OptionDef>>(iter: I) -> Self {
        Self {
            defs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a OptionDef;
    type IntoIter = std::slice::Iter<'a, OptionDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}

/// Checked extraction of a concrete Rust type from an [`OptionValue`].
///
/// Implemented for the four supported kinds: `bool`, `String`, `i64` and
/// `f64`.
pub trait FromOptionValue: Sized {
    /// Type name used in mismatch diagnostics.
    const TYPE_NAME: &'static str;

    /// Returns `None` when the value holds a different kind.
    fn from_option_value(value: &OptionValue) -> Option<Self>;
}

impl FromOptionValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromOptionValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromOptionValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromOptionValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}
