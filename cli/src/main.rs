mod config;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use subcommander_core::{
    CommandNode, HelpSummary, MAX_SUGGESTIONS, Outcome, ResolveError, resolve, suggest,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, format_help, format_report};

#[derive(Debug, Parser)]
#[command(name = "subcommander", version)]
#[command(about = "Resolve argument vectors against declarative command trees")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, subcommander_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve arguments given after `--` against a tree definition.
    Resolve(ResolveArgs),
    /// Validate one or more tree definition files.
    Validate(ValidateArgs),
    /// Rank candidate names by similarity to a target.
    Suggest(SuggestArgs),
    /// Show help data for a command in a tree definition.
    Help(HelpArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Tree definition file (YAML or JSON).
    #[arg(long)]
    tree: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Arguments to resolve, without the program name.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Tree definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// The mistyped name.
    target: String,
    /// Comma-separated candidate names.
    #[arg(long, value_delimiter = ',', required = true)]
    candidates: Vec<String>,
    /// Maximum number of suggestions.
    #[arg(long, default_value_t = MAX_SUGGESTIONS)]
    limit: usize,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Tree definition file (YAML or JSON).
    #[arg(long)]
    tree: PathBuf,
    /// Subcommand names leading to the command to describe.
    path: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Validate(args) => run_validate(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Help(args) => run_help(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let root = config::load_tree(&args.tree)?;

    let outcome = resolve(&root, &args.args).map_err(|err| err.to_string())?;
    let raw = match outcome {
        Outcome::Resolved(resolution) => {
            debug!(command = %resolution.command_path(), "Resolution succeeded");
            format_report(&resolution.report(), args.format)?
        }
        Outcome::Help(request) => format_help(&request.summary(), args.format)?,
    };
    println!("{raw}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut commands = 0usize;
    for path in &args.inputs {
        let root = config::load_tree(path)?;
        commands += count_commands(&root);
    }
    println!(
        "Validated {} tree definition file(s) with {commands} command(s).",
        args.inputs.len()
    );
    Ok(())
}

fn count_commands(node: &CommandNode) -> usize {
    1 + node.children.iter().map(count_commands).sum::<usize>()
}

fn run_suggest(args: SuggestArgs) -> Result<(), String> {
    let candidates: Vec<&str> = args
        .candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    for name in suggest(&args.target, &candidates, args.limit) {
        println!("{name}");
    }
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let root = config::load_tree(&args.tree)?;

    let mut path = vec![&root];
    for name in &args.path {
        let current = path[path.len() - 1];
        let Some(child) = current.find_child(name) else {
            let err = ResolveError::UnknownCommand {
                name: name.clone(),
                suggestions: suggest(name, &current.child_names(), MAX_SUGGESTIONS),
            };
            return Err(err.to_string());
        };
        path.push(child);
    }

    let raw = format_help(&HelpSummary::for_path(&path), args.format)?;
    println!("{raw}");
    Ok(())
}
