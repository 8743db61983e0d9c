//! Single-command program with one required option.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p subcommander-demos --example echo -- -c hello world
//! cargo run -p subcommander-demos --example echo -- --help
//! ```

use subcommander_core::{
    CommandNode, HelpSummary, Io, OptionDef, RunError, RunOutcome, ShowHelp, parse_and_run,
};

fn main() {
    let root = CommandNode::new("echo")
        .with_usage("echo <text...> [flags]")
        .with_short_help("echo is a simple command that prints the provided text")
        .with_option(OptionDef::bool("c", false).with_usage("capitalize the input"))
        .require("c")
        .with_exec(|r, io| {
            if r.args().is_empty() {
                return Err(ShowHelp::new("no text provided").into());
            }
            let mut output = r.args().join(" ");
            if r.get::<bool>("c") {
                output = output.to_uppercase();
            }
            writeln!(io.stdout, "{output}")?;
            Ok(())
        });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut io = Io::new(&mut stdin, &mut stdout, &mut stderr);

    match parse_and_run(&root, &args, &mut io) {
        Ok(RunOutcome::Completed) => {}
        Ok(RunOutcome::Help(help)) => print_help(&help),
        Err(err) => {
            if let RunError::HelpRequested { help, .. } = &err {
                print_help(help);
            }
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_help(help: &HelpSummary) {
    eprintln!("{}\n\nUsage:\n  {}", help.short_help.as_deref().unwrap_or_default(), help.usage);
    for flag in &help.flags {
        eprintln!("  {}    {}", flag.name, flag.usage);
    }
}
