//! Multi-level todo list backed by a JSON file.
//!
//! Shows options inherited from the root (`-file`, `-verbose`), options local
//! to one subcommand, and options mixed freely with positional arguments.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p subcommander-demos --example todo -- add buy milk -tags home,errands
//! cargo run -p subcommander-demos --example todo -- list --pending
//! cargo run -p subcommander-demos --example todo -- done 1 --verbose
//! cargo run -p subcommander-demos --example todo -- tags list
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use subcommander_core::{
    CommandNode, HelpSummary, Io, OptionDef, Resolution, RunOutcome, ShowHelp, parse_and_run,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Pending,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Task {
    id: u64,
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    status: Status,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskList {
    fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse task list {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn find_mut(&mut self, id: u64) -> anyhow::Result<&mut Task> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => Ok(task),
            None => bail!("task with ID {id} not found"),
        }
    }
}

fn task_file(r: &Resolution<'_>) -> PathBuf {
    let file = r.get::<String>("file");
    if file.is_empty() {
        std::env::temp_dir().join("subcommander-todo.json")
    } else {
        PathBuf::from(file)
    }
}

fn task_id(r: &Resolution<'_>) -> anyhow::Result<u64> {
    let Some(raw) = r.args().first() else {
        return Err(ShowHelp::new("missing task ID").into());
    };
    raw.parse()
        .with_context(|| format!("invalid task ID {raw:?}"))
}

fn add(r: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
    if r.args().is_empty() {
        return Err(ShowHelp::new("no task text provided").into());
    }
    let path = task_file(r);
    let mut list = TaskList::load(&path)?;
    let tags = r
        .get::<String>("tags")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let task = Task {
        id: list.next_id(),
        text: r.args().join(" "),
        tags,
        status: Status::Pending,
    };
    writeln!(io.stdout, "added task {}", task.id)?;
    list.tasks.push(task);
    list.save(&path)?;
    if r.get::<bool>("verbose") {
        writeln!(io.stderr, "saved {}", path.display())?;
    }
    Ok(())
}

fn list(r: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
    let list = TaskList::load(&task_file(r))?;
    let pending_only = r.get::<bool>("pending");
    let tag = r.get::<String>("tag");
    for task in &list.tasks {
        if pending_only && task.status != Status::Pending {
            continue;
        }
        if !tag.is_empty() && !task.tags.contains(&tag) {
            continue;
        }
        let mark = if task.status == Status::Done { "x" } else { " " };
        writeln!(io.stdout, "[{mark}] {}: {} [{}]", task.id, task.text, task.tags.join(","))?;
    }
    Ok(())
}

fn done(r: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
    let path = task_file(r);
    let mut list = TaskList::load(&path)?;
    let id = task_id(r)?;
    list.find_mut(id)?.status = Status::Done;
    list.save(&path)?;
    writeln!(io.stdout, "completed task {id}")?;
    Ok(())
}

fn remove(r: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
    let path = task_file(r);
    let mut list = TaskList::load(&path)?;
    let id = task_id(r)?;
    let before = list.tasks.len();
    list.tasks.retain(|t| t.id != id);
    if list.tasks.len() == before {
        bail!("task with ID {id} not found");
    }
    list.save(&path)?;
    writeln!(io.stdout, "removed task {id}")?;
    Ok(())
}

fn list_tags(r: &Resolution<'_>, io: &mut Io<'_>) -> anyhow::Result<()> {
    let list = TaskList::load(&task_file(r))?;
    let mut tags: Vec<&str> = list
        .tasks
        .iter()
        .flat_map(|t| t.tags.iter().map(String::as_str))
        .collect();
    tags.sort_unstable();
    tags.dedup();
    for tag in tags {
        writeln!(io.stdout, "{tag}")?;
    }
    Ok(())
}

fn tree() -> CommandNode {
    CommandNode::new("todo")
        .with_short_help("manage a todo list")
        .with_option(OptionDef::string("file", "").with_usage("path to the task file"))
        .with_option(OptionDef::bool("verbose", false).with_usage("enable verbose mode"))
        .with_child(
            CommandNode::new("add")
                .with_usage("todo add <text>... [flags]")
                .with_short_help("add a task")
                .with_option(OptionDef::string("tags", "").with_usage("comma-separated tags"))
                .with_exec(add),
        )
        .with_child(
            CommandNode::new("list")
                .with_short_help("list tasks")
                .with_option(OptionDef::bool("pending", false).with_usage("only pending tasks"))
                .with_option(OptionDef::string("tag", "").with_usage("only tasks with this tag"))
                .with_exec(list),
        )
        .with_child(
            CommandNode::new("done")
                .with_usage("todo done <id> [flags]")
                .with_short_help("mark a task as done")
                .with_exec(done),
        )
        .with_child(
            CommandNode::new("remove")
                .with_usage("todo remove <id> [flags]")
                .with_short_help("delete a task")
                .with_exec(remove),
        )
        .with_child(
            CommandNode::new("tags")
                .with_short_help("work with tags")
                .with_child(
                    CommandNode::new("list")
                        .with_short_help("list all tags in use")
                        .with_exec(list_tags),
                ),
        )
}

fn print_help(help: &HelpSummary) {
    if let Some(text) = &help.short_help {
        eprintln!("{text}\n");
    }
    eprintln!("Usage:\n  {}\n", help.usage);
    if !help.subcommands.is_empty() {
        eprintln!("Available Commands:");
        for sub in &help.subcommands {
            eprintln!("  {:<10}{}", sub.name, sub.short_help.as_deref().unwrap_or(""));
        }
        eprintln!();
    }
    for (title, flags) in [("Flags", &help.flags), ("Global Flags", &help.global_flags)] {
        if flags.is_empty() {
            continue;
        }
        eprintln!("{title}:");
        for flag in flags {
            eprintln!("  {:<10}{} (default: {})", flag.name, flag.usage, flag.default);
        }
        eprintln!();
    }
}

fn main() {
    let root = tree();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut io = Io::new(&mut stdin, &mut stdout, &mut stderr);

    match parse_and_run(&root, &args, &mut io) {
        Ok(RunOutcome::Completed) => {}
        Ok(RunOutcome::Help(help)) => print_help(&help),
        Err(err) => {
            if let Some(help) = err.help() {
                print_help(help);
            }
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
