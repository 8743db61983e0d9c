//! Output formatting for resolutions and help data.

use serde::Serialize;
use subcommander_core::{FlagEntry, HelpSummary, OptionValue, ResolutionReport};

/// Total width help text is wrapped to.
const HELP_WIDTH: usize = 80;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Option<Result<String, String>> {
    match format {
        OutputFormat::Json => Some(
            serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {e}")),
        ),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}")),
        ),
        OutputFormat::Text => None,
    }
}

/// Formats a resolution report in the requested output format.
pub fn format_report(report: &ResolutionReport, format: OutputFormat) -> Result<String, String> {
    serialize(report, format).unwrap_or_else(|| Ok(report_to_text(report)))
}

/// Formats help data in the requested output format.
pub fn format_help(help: &HelpSummary, format: OutputFormat) -> Result<String, String> {
    serialize(help, format).unwrap_or_else(|| Ok(help_to_text(help)))
}

fn report_to_text(report: &ResolutionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("command: {}\n", report.command.join(" ")));
    if !report.executable {
        out.push_str("executable: no\n");
    }
    if !report.values.is_empty() {
        out.push_str("options:\n");
        for (name, value) in &report.values {
            out.push_str(&format!("  -{name}={}\n", display_value(value)));
        }
    }
    if report.args.is_empty() {
        out.push_str("args: (none)\n");
    } else {
        out.push_str("args:\n");
        for arg in &report.args {
            out.push_str(&format!("  {arg}\n"));
        }
    }
    out.trim_end().to_string()
}

fn display_value(value: &OptionValue) -> String {
    match value {
        OptionValue::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

/// Renders help as plain text, in the conventional Usage / Available
/// Commands / Flags / Global Flags layout.
pub fn help_to_text(help: &HelpSummary) -> String {
    let mut out = String::new();

    if let Some(short_help) = &help.short_help {
        out.push_str(short_help);
        out.push_str("\n\n");
    }

    out.push_str("Usage:\n");
    out.push_str(&format!("  {}\n\n", help.usage));

    if !help.subcommands.is_empty() {
        out.push_str("Available Commands:\n");
        let width = help
            .subcommands
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0);
        for sub in &help.subcommands {
            match &sub.short_help {
                Some(text) => write_row(&mut out, &sub.name, width, text),
                None => out.push_str(&format!("  {}\n", sub.name)),
            }
        }
        out.push('\n');
    }

    let width = help
        .flags
        .iter()
        .chain(&help.global_flags)
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);

    if !help.flags.is_empty() {
        out.push_str("Flags:\n");
        write_flags(&mut out, &help.flags, width);
        out.push('\n');
    }
    if !help.global_flags.is_empty() {
        out.push_str("Global Flags:\n");
        write_flags(&mut out, &help.global_flags, width);
        out.push('\n');
    }

    if !help.subcommands.is_empty() {
        out.push_str(&format!(
            "Use \"{} [command] --help\" for more information about a command.\n",
            help.command
        ));
    }

    out.trim_end().to_string()
}

fn write_flags(out: &mut String, flags: &[FlagEntry], width: usize) {
    for flag in flags {
        let mut description = flag.usage.clone();
        let default = flag.default.to_string();
        if !default.is_empty() {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&format!("(default: {default})"));
        }
        write_row(out, &flag.name, width, &description);
    }
}

fn write_row(out: &mut String, name: &str, width: usize, text: &str) {
    let column = width + 4;
    let lines = wrap(text, HELP_WIDTH.saturating_sub(column).max(20));
    match lines.first().filter(|line| !line.is_empty()) {
        Some(first) => {
            let padding = " ".repeat(column - name.len());
            out.push_str(&format!("  {name}{padding}{first}\n"));
        }
        None => out.push_str(&format!("  {name}\n")),
    }
    let indent = " ".repeat(column + 2);
    for line in lines.iter().skip(1) {
        out.push_str(&format!("{indent}{line}\n"));
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
