//! The result of a successful resolution and typed access to its options.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::compose::MergedOptions;
use crate::error::ResolveError;
use crate::help::HelpSummary;
use crate::options::{FromOptionValue, OptionValue};
use crate::types::{CommandNode, ExecHandle, command_path};

/// Option values parsed during one resolution.
///
/// Keyed by the declaring node's depth in the resolved path and the option
/// name. Options that were never supplied have no entry and read as their
/// declared default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: HashMap<(usize, String), OptionValue>,
}

impl ValueStore {
    /// Stores a value, replacing any earlier one.
    pub fn set(&mut self, depth: usize, name: &str, value: OptionValue) {
        self.values.insert((depth, name.to_string()), value);
    }

    pub fn get(&self, depth: usize, name: &str) -> Option<&OptionValue> {
        self.values.get(&(depth, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A resolved command path, its parsed option values and leftover arguments.
///
/// Borrowing the tree keeps the path cheap; the tree itself is untouched, so
/// several `Resolution`s over the same tree can coexist.
#[derive(Debug, Clone)]
pub struct Resolution<'t> {
    path: Vec<&'t CommandNode>,
    args: Vec<String>,
    values: ValueStore,
}

impl<'t> Resolution<'t> {
    pub(crate) fn new(path: Vec<&'t CommandNode>, args: Vec<String>, values: ValueStore) -> Self {
        debug_assert!(!path.is_empty(), "resolved path always contains the root");
        Self { path, args, values }
    }

    /// Root-to-terminal command path.
    pub fn path(&self) -> &[&'t CommandNode] {
        &self.path
    }

    /// The selected command.
    pub fn terminal(&self) -> &'t CommandNode {
        self.path[self.path.len() - 1]
    }

    /// Space-joined names along the path, e.g. `todo nested sub`.
    pub fn command_path(&self) -> String {
        command_path(&self.path)
    }

    /// Leftover positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Values explicitly parsed in this resolution.
    pub fn store(&self) -> &ValueStore {
        &self.values
    }

    /// Whether the terminal command can be executed.
    pub fn has_exec(&self) -> bool {
        self.terminal().exec.is_some()
    }

    /// Returns the terminal's execution handle.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoExec`] when the terminal command has no
    /// execution logic attached.
    pub fn ensure_exec(&self) -> Result<&'t ExecHandle, ResolveError> {
        self.terminal()
            .exec
            .as_ref()
            .ok_or_else(|| ResolveError::NoExec {
                command: self.command_path(),
            })
    }

    /// Finds the nearest declaration of `name`, walking terminal to root.
    fn declaring(&self, name: &str) -> Option<(usize, &'t CommandNode)> {
        self.path
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| node.options.contains(name))
            .map(|(depth, node)| (depth, *node))
    }

    /// Current value of `name`, or `None` if no command on the path declares
    /// it.
    pub fn value(&self, name: &str) -> Option<&OptionValue> {
        let (depth, node) = self.declaring(name)?;
        self.values
            .get(depth, name)
            .or_else(|| node.options.lookup(name).map(|d| &d.default))
    }

    /// Whether `name` was supplied in this resolution, as opposed to holding
    /// its default.
    pub fn is_set(&self, name: &str) -> bool {
        self.declaring(name)
            .is_some_and(|(depth, _)| self.values.get(depth, name).is_some())
    }

    /// Typed value of option `name`, looked up from the terminal command
    /// towards the root.
    ///
    /// # Panics
    ///
    /// Panics if no command on the path declares `name`, or if the option was
    /// declared with a different type than `T`. Both mean the execution logic
    /// and the option declarations disagree, which is a programming error.
    ///
    /// # Examples
    ///
    /// ```
    /// use subcommander_core::*;
    ///
    /// let root = CommandNode::new("todo")
    ///     .with_option(OptionDef::bool("verbose", false))
    ///     .with_child(CommandNode::new("add").with_option(OptionDef::int("count", 1)));
    ///
    /// let outcome = resolve(&root, &["add", "--verbose", "-count=3"]).unwrap();
    /// let resolution = outcome.into_resolution().unwrap();
    /// assert!(resolution.get::<bool>("verbose"));
    /// assert_eq!(resolution.get::<i64>("count"), 3);
    /// ```
    #[track_caller]
    pub fn get<T: FromOptionValue>(&self, name: &str) -> T {
        let Some((depth, node)) = self.declaring(name) else {
            panic!(
                "flag \"-{name}\" not found in command \"{}\" flag set",
                self.command_path()
            );
        };
        let value = match self.values.get(depth, name) {
            Some(value) => value,
            None => match node.options.lookup(name) {
                Some(def) => &def.default,
                None => unreachable!("declaring node lists the option"),
            },
        };
        match T::from_option_value(value) {
            Some(v) => v,
            None => panic!(
                "type mismatch for flag \"-{name}\" in command \"{}\": registered {}, requested {}",
                self.command_path(),
                value.kind().type_name(),
                T::TYPE_NAME
            ),
        }
    }

    /// Effective values of every option visible to the terminal command, in
    /// merged order.
    pub fn values(&self) -> Vec<(String, OptionValue)> {
        MergedOptions::compose(&self.path)
            .iter()
            .map(|entry| {
                let value = self
                    .values
                    .get(entry.depth, &entry.def.name)
                    .unwrap_or(&entry.def.default)
                    .clone();
                (entry.def.name.clone(), value)
            })
            .collect()
    }

    /// Help data for the terminal command.
    pub fn help(&self) -> HelpSummary {
        HelpSummary::for_path(&self.path)
    }

    /// Serializable snapshot of this resolution.
    pub fn report(&self) -> ResolutionReport {
        ResolutionReport {
            command: self.path.iter().map(|n| n.name.clone()).collect(),
            values: self.values().into_iter().collect(),
            args: self.args.clone(),
            executable: self.has_exec(),
        }
    }
}

/// Owned, serializable view of a [`Resolution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionReport {
    /// Command names from root to terminal.
    pub command: Vec<String>,
    /// Effective option values by name.
    pub values: BTreeMap<String, OptionValue>,
    pub args: Vec<String>,
    /// Whether the terminal command has an execution handle.
    pub executable: bool,
}

#[cfg(test)]
mod tests {
    use crate::{OptionDef, resolve};

    use super::*;

    fn tree() -> CommandNode {
        CommandNode::new("todo")
            .with_option(OptionDef::bool("verbose", false))
            .with_option(OptionDef::string("format", "text"))
            .with_child(
                CommandNode::new("add")
                    .with_option(OptionDef::int("count", 1))
                    .with_option(OptionDef::bool("format", false))
                    .with_exec(|_, _| Ok(())),
            )
    }

    #[test]
    fn test_value_walks_from_terminal() {
        let root = tree();
        let resolution = resolve(&root, &["add", "--format"])
            .unwrap()
            .into_resolution()
            .unwrap();

        assert_eq!(resolution.value("format"), Some(&OptionValue::Bool(true)));
        assert_eq!(resolution.value("verbose"), Some(&OptionValue::Bool(false)));
        assert_eq!(resolution.value("count"), Some(&OptionValue::Int(1)));
        assert_eq!(resolution.value("missing"), None);
        assert!(resolution.is_set("format"));
        assert!(!resolution.is_set("verbose"));
        assert!(resolution.get::<bool>("format"));
    }

    #[test]
    fn test_values_lists_effective_options() {
        let root = tree();
        let resolution = resolve(&root, &["add", "-count", "4"])
            .unwrap()
            .into_resolution()
            .unwrap();

        assert_eq!(
            resolution.values(),
            vec![
                ("verbose".to_string(), OptionValue::Bool(false)),
                ("format".to_string(), OptionValue::Bool(false)),
                ("count".to_string(), OptionValue::Int(4)),
            ]
        );
        assert_eq!(resolution.store().len(), 1);
    }

    #[test]
    fn test_ensure_exec() {
        let root = tree();
        let at_root = resolve(&root, &[] as &[&str]).unwrap().into_resolution().unwrap();
        assert!(!at_root.has_exec());
        assert_eq!(
            at_root.ensure_exec().unwrap_err(),
            ResolveError::NoExec {
                command: "todo".to_string()
            }
        );

        let at_add = resolve(&root, &["add"]).unwrap().into_resolution().unwrap();
        assert!(at_add.ensure_exec().is_ok());
    }

    #[test]
    #[should_panic(expected = "flag \"-version\" not found in command \"todo add\" flag set")]
    fn test_get_unknown_option_panics() {
        let root = tree();
        let resolution = resolve(&root, &["add"]).unwrap().into_resolution().unwrap();
        let _: bool = resolution.get("version");
    }

    #[test]
    #[should_panic(
        expected = "type mismatch for flag \"-count\" in command \"todo add\": registered i64, requested String"
    )]
    fn test_get_wrong_type_panics() {
        let root = tree();
        let resolution = resolve(&root, &["add"]).unwrap().into_resolution().unwrap();
        let _: String = resolution.get("count");
    }
}
