//! Help, usage and error text as rendered through the public API.

use argsmith::{
    ArgType, ArgumentOptions, CommandOptions, FormatOptions, MaxWidth, Nargs, Parser,
    ParserOptions, SectionOptions, ValueOptions,
};

fn without_version() -> ParserOptions {
    ParserOptions {
        add_version: false,
        ..ParserOptions::default()
    }
}

fn parser(prog: &str) -> Parser {
    Parser::builder()
        .prog(prog)
        .options(without_version())
        .build()
        .unwrap()
}

fn todo_parser() -> Parser {
    let mut parser = Parser::builder()
        .prog("todo")
        .version("1.0.0")
        .build()
        .unwrap();
    parser
        .add_argument(
            ["-V", "--verbose"],
            ArgumentOptions::of(ArgType::Count).description("Print more detail."),
        )
        .unwrap();
    parser
        .add_argument(
            ["-o", "--output"],
            ArgumentOptions::of(ArgType::String)
                .metavar("FILE")
                .description("Write results to FILE."),
        )
        .unwrap();
    parser
        .add_argument(["file"], ArgumentOptions::new().description("The task file."))
        .unwrap();
    parser
}

#[test]
fn full_help_screen() {
    let expected = "\
usage: todo [-h] [-v] [-V] [-o FILE] FILE

Positional arguments:
  FILE                    The task file.

Optional arguments:
  -h, --help              Show this help message and exit.
  -v, --version           Show program's version number and exit.
  -V, --verbose           Print more detail.
  -o FILE, --output FILE  Write results to FILE.";
    assert_eq!(todo_parser().format_help(), expected);
}

#[test]
fn usage_shows_required_positionals_bare_and_options_bracketed() {
    assert_eq!(
        todo_parser().format_usage(),
        "usage: todo [-h] [-v] [-V] [-o FILE] FILE"
    );
}

#[test]
fn renders_are_byte_identical() {
    let parser = todo_parser();
    assert_eq!(parser.format_help(), parser.format_help());
    assert_eq!(todo_parser().format_help(), parser.format_help());
}

#[test]
fn argument_column_has_a_minimum_width() {
    let mut parser = parser("tool");
    parser
        .add_argument(["-q"], ArgumentOptions::new().description("Say less."))
        .unwrap();
    let expected = "\
usage: tool [-h] [-q]

Optional arguments:
  -h, --help    Show this help message and exit.
  -q            Say less.";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn wide_summaries_overflow_onto_their_own_line() {
    let mut parser = parser("tool");
    parser
        .add_argument(
            ["-c", "--configuration-file"],
            ArgumentOptions::of(ArgType::Path).description("Read settings from PATH."),
        )
        .unwrap();
    let expected = "\
usage: tool [-h] [-c PATH]

Optional arguments:
  -h, --help                  Show this help message and exit.
  -c PATH, --configuration-file PATH
                              Read settings from PATH.";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn commands_are_listed_and_have_their_own_help() {
    let mut parser = parser("tool");
    let remote = parser
        .add_command("remote", CommandOptions::new().description("Manage remotes."))
        .unwrap();
    parser
        .add_argument_to(remote, ["name"], ArgumentOptions::new().description("Remote name."))
        .unwrap();

    let root = "\
usage: tool [-h]

Commands:
  remote        Manage remotes.

Optional arguments:
  -h, --help    Show this help message and exit.";
    assert_eq!(parser.format_help(), root);

    let sub = "\
usage: tool remote NAME

Manage remotes.

Positional arguments:
  NAME          Remote name.";
    assert_eq!(parser.format_help_for(remote), sub);
}

#[test]
fn title_prologue_and_epilogue_surround_the_listing() {
    let parser = Parser::builder()
        .prog("tool")
        .title("Tool 3000")
        .help(["Does tool things."])
        .epilogue(["See the manual for more."])
        .options(without_version())
        .build()
        .unwrap();
    let expected = "\
Tool 3000

usage: tool [-h]

Does tool things.

Optional arguments:
  -h, --help    Show this help message and exit.

See the manual for more.";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn accepted_values_are_listed_under_their_argument() {
    let mut parser = parser("tool");
    let level = parser
        .add_argument(
            ["--level"],
            ArgumentOptions::of(ArgType::String).description("Log level."),
        )
        .unwrap();
    parser
        .add_value(level, "low", ValueOptions::new().description("Quiet."))
        .unwrap();
    parser.add_value(level, "high", ValueOptions::new()).unwrap();
    let expected = "\
usage: tool [-h] [--level LEVEL]

Optional arguments:
  -h, --help     Show this help message and exit.
  --level LEVEL  Log level.
                     - low: Quiet.
                     - high";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn custom_sections_render_before_positionals() {
    let mut parser = parser("tool");
    let section = parser.add_section(
        "Filters:",
        SectionOptions::new().description("Narrow the results."),
    );
    parser
        .add_argument_to(section, ["--tag"], ArgumentOptions::of(ArgType::String))
        .unwrap();
    parser.add_text(section, ["Filters combine with AND."]);
    let expected = "\
usage: tool [-h] [--tag TAG]

Filters:
  Narrow the results.
  --tag TAG
  Filters combine with AND.

Optional arguments:
  -h, --help    Show this help message and exit.";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn variadic_metavars_in_help_and_usage() {
    let mut parser = parser("tool");
    parser
        .add_argument(
            ["items"],
            ArgumentOptions::new().nargs(Nargs::ZeroOrMore),
        )
        .unwrap();
    parser
        .add_argument(
            ["--pair"],
            ArgumentOptions::of(ArgType::String)
                .metavars(["KEY", "VALUE"])
                .nargs(Nargs::Exact(2)),
        )
        .unwrap();
    let help = parser.format_help();
    assert!(help.starts_with("usage: tool [-h] [ITEMS ...] [--pair KEY VALUE]\n"));
    assert!(help.contains("  [ITEMS [ITEMS ...]]"));
    assert!(help.contains("  --pair KEY VALUE"));
}

#[test]
fn compact_usage_collapses_options() {
    let format = FormatOptions {
        compact_usage: true,
        ..FormatOptions::default()
    };
    let mut parser = Parser::builder()
        .prog("tool")
        .format(format)
        .build()
        .unwrap();
    parser.add_argument(["file"], ArgumentOptions::new()).unwrap();
    assert_eq!(parser.format_usage(), "usage: tool [options] FILE");
}

#[test]
fn long_usage_wraps_under_its_items() {
    let format = FormatOptions {
        max_width: MaxWidth::Columns(30),
        ..FormatOptions::default()
    };
    let mut parser = Parser::builder()
        .prog("tool")
        .options(without_version())
        .format(format)
        .build()
        .unwrap();
    for code in ["--alpha", "--bravo", "--charlie"] {
        parser.add_argument([code], ArgumentOptions::new()).unwrap();
    }
    assert_eq!(
        parser.format_usage(),
        "usage: tool [-h] [--alpha]\n            [--bravo]\n            [--charlie]"
    );
}

#[test]
fn abbreviated_errors_show_usage_and_reason() {
    let parser = todo_parser();
    let err = parser.try_parse_from(["--nope"]).unwrap_err();
    assert_eq!(
        parser.format_error(err.as_parse().unwrap()),
        "usage: todo [-h] [-v] [-V] [-o FILE] FILE\n\
         todo: error: Unrecognized arguments: --nope."
    );
}

#[test]
fn missing_arguments_are_named_in_the_error() {
    let parser = todo_parser();
    let err = parser.try_parse_from(["-V"]).unwrap_err();
    let text = parser.format_error(err.as_parse().unwrap());
    assert!(text.ends_with("todo: error: The following arguments are required: FILE."));
}

#[test]
fn values_attached_to_flags_are_rejected() {
    let mut parser = parser("tool");
    parser
        .add_argument(["-q", "--quiet"], ArgumentOptions::new())
        .unwrap();
    let err = parser.try_parse_from(["--quiet=false"]).unwrap_err();
    assert_eq!(
        parser.format_error(err.as_parse().unwrap()),
        "usage: tool [-h] [-q]\n\
         tool: error: Argument -q/--quiet: expected 0 arguments."
    );
}

#[test]
fn invalid_choices_list_the_accepted_values() {
    let mut parser = parser("tool");
    let mode = parser
        .add_argument(["--mode"], ArgumentOptions::of(ArgType::String))
        .unwrap();
    parser.add_value(mode, "fast", ValueOptions::new()).unwrap();
    parser.add_value(mode, "safe", ValueOptions::new()).unwrap();
    let err = parser.try_parse_from(["--mode", "slow"]).unwrap_err();
    let text = parser.format_error(err.as_parse().unwrap());
    assert!(text.ends_with(
        "tool: error: Argument --mode: value must be one of 'fast', 'safe': 'slow'."
    ));
}

#[test]
fn separate_columns_align_long_codes() {
    let format = FormatOptions {
        arg_separate_cols: true,
        ..FormatOptions::default()
    };
    let mut parser = Parser::builder()
        .prog("tool")
        .options(without_version())
        .format(format)
        .build()
        .unwrap();
    parser
        .add_argument(["--all"], ArgumentOptions::new().description("Everything."))
        .unwrap();
    let expected = "\
usage: tool [-h] [--all]

Optional arguments:
  -h, --help    Show this help message and exit.
      --all     Everything.";
    assert_eq!(parser.format_help(), expected);
}

fn separate_columns_parser() -> Parser {
    let format = FormatOptions {
        arg_separate_cols: true,
        ..FormatOptions::default()
    };
    Parser::builder()
        .prog("tool")
        .options(without_version())
        .format(format)
        .build()
        .unwrap()
}

#[test]
fn separate_columns_overflow_wide_long_codes() {
    let mut parser = separate_columns_parser();
    parser
        .add_argument(
            ["-c", "--configuration-file"],
            ArgumentOptions::of(ArgType::Path).description("Read settings from PATH."),
        )
        .unwrap();
    let expected = "\
usage: tool [-h] [-c PATH]

Optional arguments:
  -h, --help                  Show this help message and exit.
  -c, --configuration-file PATH
                              Read settings from PATH.";
    assert_eq!(parser.format_help(), expected);
}

#[test]
fn separate_columns_keep_wide_short_summaries_out_of_the_short_column() {
    let mut parser = separate_columns_parser();
    parser
        .add_argument(
            ["-I"],
            ArgumentOptions::of(ArgType::String)
                .nargs(Nargs::OneOrMore)
                .metavar("INCLUDE_DIR")
                .description("Directories searched for headers, in the order given."),
        )
        .unwrap();
    let expected = "\
usage: tool [-h] [-I INCLUDE_DIR [INCLUDE_DIR ...]]

Optional arguments:
  -h, --help    Show this help message and exit.
  -I INCLUDE_DIR [INCLUDE_DIR ...]
                Directories searched for headers, in the order given.";
    let help = parser.format_help();
    assert_eq!(help, expected);
    for line in help.lines() {
        assert!(line.chars().count() <= 80, "{line:?} is wider than 80");
    }
}
