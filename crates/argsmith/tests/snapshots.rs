use argsmith::{ArgType, ArgumentOptions, CommandOptions, Nargs, Parser, ValueOptions};
use insta::{assert_json_snapshot, assert_snapshot};

fn todo() -> Parser {
    let mut parser = Parser::builder()
        .prog("todo")
        .version("1.4.0")
        .title("todo - a small task tracker")
        .help(["Keeps tasks in a plain text file next to your project."])
        .epilogue(["Run 'todo <command> --help' for command options."])
        .build()
        .unwrap();
    parser
        .add_argument(
            ["-f", "--file"],
            ArgumentOptions::of(ArgType::Path).description("Task file to use instead of ./todo.txt."),
        )
        .unwrap();

    let add = parser
        .add_command("add", CommandOptions::new().description("Add a task."))
        .unwrap();
    let priority = parser
        .add_argument_to(
            add,
            ["-p", "--priority"],
            ArgumentOptions::of(ArgType::String).description("How urgent the task is."),
        )
        .unwrap();
    parser.add_value(priority, "low", ValueOptions::new()).unwrap();
    parser
        .add_value(priority, "high", ValueOptions::new().description("Shown first."))
        .unwrap();
    parser
        .add_argument_to(
            add,
            ["title"],
            ArgumentOptions::new()
                .nargs(Nargs::OneOrMore)
                .description("Words of the task title."),
        )
        .unwrap();

    parser
        .add_command("list", CommandOptions::new().description("List open tasks."))
        .unwrap();
    parser
        .add_command("done", CommandOptions::new().description("Mark tasks as done."))
        .unwrap();
    parser
}

#[test]
fn test_snapshots_root_help() {
    assert_snapshot!("root_help", todo().format_help());
}

#[test]
fn test_snapshots_command_help() {
    let parser = todo();
    let add = parser.declaration().find_command(&["add"]).unwrap();
    assert_snapshot!("add_help", parser.format_help_for(add));
}

#[test]
fn test_snapshots_parsed_json() {
    let parsed = todo()
        .try_parse_from(["add", "-p", "high", "water", "the", "plants"])
        .unwrap();
    assert_json_snapshot!("add_parsed", parsed);
}
