//! `tasks`: a small task tracker front end that prints what it parsed.
//!
//! Every successful parse is printed as JSON on stdout, so the binary
//! doubles as a playground for declarations:
//!
//! ```text
//! $ argsmith-demo add -p high water the plants
//! $ argsmith-demo --help
//! $ RUST_LOG=argsmith=debug argsmith-demo list --all
//! ```

use anyhow::{Context, Result};
use argsmith::{
    ArgType, ArgumentOptions, CommandOptions, FormatOptions, Nargs, Parser, SectionOptions,
    ValueOptions,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Loaded when `ARGSMITH_DEMO_FORMAT` points at a YAML file.
const FORMAT_ENV: &str = "ARGSMITH_DEMO_FORMAT";

fn format_options() -> Result<FormatOptions> {
    match std::env::var_os(FORMAT_ENV) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.to_string_lossy()))?;
            Ok(FormatOptions::from_yaml(&text)?)
        }
        None => Ok(FormatOptions::default()),
    }
}

fn build_parser() -> Result<Parser> {
    let mut parser = Parser::builder()
        .prog("tasks")
        .version(env!("CARGO_PKG_VERSION"))
        .title("tasks - keep a list of things to do")
        .help(["Tasks live in a plain text file, one per line."])
        .epilogue(["Run 'tasks <command> --help' for the options of a command."])
        .format(format_options()?)
        .detect_terminal_width()
        .build()?;

    parser.add_argument(
        ["-f", "--file"],
        ArgumentOptions::of(ArgType::Path).description("Task file to use instead of ./tasks.txt."),
    )?;
    parser.add_argument(
        ["-V", "--verbose"],
        ArgumentOptions::of(ArgType::Count).description("Print more detail. Repeat for even more."),
    )?;

    let add = parser.add_command("add", CommandOptions::new().description("Add a task."))?;
    let priority = parser.add_argument_to(
        add,
        ["-p", "--priority"],
        ArgumentOptions::of(ArgType::String).description("How urgent the task is."),
    )?;
    parser.add_value(priority, "low", ValueOptions::new())?;
    parser.add_value(priority, "normal", ValueOptions::new().description("The default."))?;
    parser.add_value(priority, "high", ValueOptions::new().description("Listed first."))?;
    parser.add_argument_to(
        add,
        ["title"],
        ArgumentOptions::new()
            .nargs(Nargs::OneOrMore)
            .description("Words of the task title."),
    )?;

    let list = parser.add_command("list", CommandOptions::new().description("List tasks."))?;
    let filters = parser.add_section_to(
        list,
        "Filters:",
        SectionOptions::new().description("Filters combine; a task must match all of them."),
    );
    parser.add_argument_to(
        filters,
        ["-a", "--all"],
        ArgumentOptions::new().description("Include finished tasks."),
    )?;
    parser.add_argument_to(
        filters,
        ["--limit"],
        ArgumentOptions::of(ArgType::Integer)
            .metavar("N")
            .description("Show at most N tasks."),
    )?;

    let done = parser.add_command("done", CommandOptions::new().description("Finish tasks."))?;
    parser.add_argument_to(
        done,
        ["ids"],
        ArgumentOptions::of(ArgType::Integer)
            .nargs(Nargs::OneOrMore)
            .metavar("ID")
            .description("Numbers of the tasks, as shown by 'list'."),
    )?;

    Ok(parser)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let parser = build_parser()?;
    let parsed = parser.parse();
    info!(commands = ?parsed.commands, "parsed command line");

    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
