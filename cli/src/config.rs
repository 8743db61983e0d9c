//! Loading command tree definition files.

use std::fs;
use std::path::Path;

use subcommander_core::{CommandNode, TreeDefinition, validate_tree};

/// Reads a tree definition, choosing JSON or YAML by file extension.
///
/// Files without a `.json` extension are read as YAML, which also accepts
/// plain JSON documents.
pub fn load_definition(path: &Path) -> Result<TreeDefinition, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        TreeDefinition::from_json_str(&raw)
    } else {
        TreeDefinition::from_yaml_str(&raw)
    };
    parsed.map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
}

/// Loads, converts and structurally validates a tree definition.
pub fn load_tree(path: &Path) -> Result<CommandNode, String> {
    let root = load_definition(path)?
        .into_node()
        .map_err(|err| format!("{}: {err}", path.display()))?;
    validate_tree(&root).map_err(|err| format!("{}: {err}", path.display()))?;
    tracing::debug!(path = %path.display(), command = %root.name, "Loaded command tree");
    Ok(root)
}
