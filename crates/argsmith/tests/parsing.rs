//! End-to-end parsing through [`Parser`].

use argsmith::{
    ArgType, ArgumentOptions, CommandOptions, ConfigError, DashStyle, Error, FormatOptions,
    Nargs, Outcome, ParseErrorKind, Parser, ParserOptions, Stream, SystemCallback, Value,
};
use proptest::prelude::*;

fn git() -> Parser {
    let mut parser = Parser::builder().prog("git").version("2.44.0").build().unwrap();
    parser
        .add_argument(["-C"], ArgumentOptions::of(ArgType::Path).metavar("DIR"))
        .unwrap();
    let remote = parser
        .add_command("remote", CommandOptions::new().description("Manage remotes."))
        .unwrap();
    let add = parser
        .add_command_to(remote, "add", CommandOptions::new())
        .unwrap();
    parser
        .add_argument_to(add, ["-f", "--fetch"], ArgumentOptions::new())
        .unwrap();
    parser.add_argument_to(add, ["name"], ArgumentOptions::new()).unwrap();
    parser.add_argument_to(add, ["url"], ArgumentOptions::new()).unwrap();
    parser
}

fn parse_kind(result: Result<argsmith::Parsed, Error>) -> ParseErrorKind {
    result.unwrap_err().as_parse().expect("a parse error").kind
}

#[test]
fn nested_commands_collect_their_arguments() {
    let parsed = git()
        .try_parse_from(["remote", "add", "-f", "origin", "git@host:repo"])
        .unwrap();
    assert_eq!(parsed.commands, vec!["remote", "add"]);
    assert!(parsed.flag("fetch"));
    assert_eq!(parsed.string("name"), Some("origin"));
    assert_eq!(parsed.string("url"), Some("git@host:repo"));
    assert_eq!(parsed.supplied, vec!["fetch", "name", "url"]);
}

#[test]
fn root_options_end_command_selection() {
    let err = git()
        .try_parse_from(["-C", "/tmp", "remote", "add"])
        .unwrap_err();
    assert_eq!(
        err.as_parse().map(|err| err.kind),
        Some(ParseErrorKind::IncorrectNumberOfValues)
    );
}

#[test]
fn subcommand_help_is_reachable() {
    let parser = git();
    let remote = parser.declaration().find_command(&["remote"]).unwrap();
    assert_eq!(
        parser.evaluate(["remote", "--help"]),
        Outcome::Exit {
            code: 0,
            message: parser.format_help_for(remote),
            stream: Stream::Out,
        }
    );
}

#[test]
fn help_suppresses_missing_arguments() {
    let parser = git();
    assert_eq!(
        parse_kind(parser.try_parse_from(["remote", "add"])),
        ParseErrorKind::MissingArguments
    );
    let parsed = parser.try_parse_from(["remote", "add", "--help"]).unwrap();
    assert_eq!(parsed.system_callback, Some(SystemCallback::Usage));
    assert_eq!(parsed.commands, vec!["remote", "add"]);
}

#[test]
fn version_prints_program_and_version() {
    assert_eq!(
        git().evaluate(["--version"]),
        Outcome::Exit {
            code: 0,
            message: "git 2.44.0".to_string(),
            stream: Stream::Out,
        }
    );
}

#[test]
fn missing_version_defaults_to_zero() {
    let parser = Parser::new("bare").unwrap();
    assert_eq!(parser.format_version(), "bare 0.0.0");
}

#[test]
fn exact_arity_rejects_too_few_and_too_many() {
    let mut parser = Parser::new("plot").unwrap();
    parser
        .add_argument(
            ["--xyz"],
            ArgumentOptions::of(ArgType::Integer).nargs(Nargs::Exact(3)),
        )
        .unwrap();

    let parsed = parser.try_parse_from(["--xyz", "1", "2", "3"]).unwrap();
    assert_eq!(
        parsed.list("xyz"),
        &[Value::Int(1), Value::Int(2), Value::Int(3)]
    );
    for words in [&["--xyz", "1", "2"][..], &["--xyz", "1", "2", "3", "4"][..]] {
        assert_eq!(
            parse_kind(parser.try_parse_from(words)),
            ParseErrorKind::IncorrectNumberOfValues
        );
    }
}

#[test]
fn one_or_more_positional() {
    let mut parser = Parser::new("cat").unwrap();
    parser
        .add_argument(["files"], ArgumentOptions::new().nargs(Nargs::OneOrMore))
        .unwrap();
    assert_eq!(
        parse_kind(parser.try_parse_from(Vec::<String>::new())),
        ParseErrorKind::MissingArguments
    );
    let parsed = parser.try_parse_from(["a", "b"]).unwrap();
    assert_eq!(parsed.list("files").len(), 2);
}

#[test]
fn repeated_short_flags_count() {
    let options = ParserOptions {
        add_version: false,
        ..ParserOptions::default()
    };
    let mut parser = Parser::builder().options(options).build().unwrap();
    parser
        .add_argument(["-v", "--verbose"], ArgumentOptions::of(ArgType::Count))
        .unwrap();
    assert_eq!(parser.try_parse_from(["-vvv"]).unwrap().count("verbose"), 3);
}

#[test]
fn duplicate_codes_are_rejected_across_commands() {
    let mut parser = Parser::new("tool").unwrap();
    parser.add_argument(["-x"], ArgumentOptions::new()).unwrap();
    let sub = parser.add_command("sub", CommandOptions::new()).unwrap();
    let err = parser
        .add_argument_to(sub, ["-x", "--extra"], ArgumentOptions::new())
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateCodes { .. }));
    assert_eq!(
        err.to_string(),
        "cannot add argument with codes [-x, --extra]: argument codes already in use"
    );
}

#[test]
fn automatic_version_collides_with_user_v() {
    let mut parser = Parser::new("tool").unwrap();
    let err = parser
        .add_argument(["-v", "--verbose"], ArgumentOptions::new())
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateCodes { .. }));
}

#[test]
fn single_dash_style() {
    let mut parser = Parser::builder()
        .prog("find")
        .dash_style(DashStyle::Single)
        .build()
        .unwrap();
    parser
        .add_argument(["-name"], ArgumentOptions::of(ArgType::String))
        .unwrap();
    let parsed = parser.try_parse_from(["-name", "*.rs"]).unwrap();
    assert_eq!(parsed.string("name"), Some("*.rs"));
    assert!(parser.format_help().contains("-h, -help"));
}

#[test]
fn evaluate_renders_errors_for_the_failing_command() {
    let parser = git();
    let Outcome::Exit {
        code,
        message,
        stream,
    } = parser.evaluate(["remote", "add", "origin"])
    else {
        panic!("expected an exit");
    };
    assert_eq!((code, stream), (1, Stream::Err));
    assert!(message.starts_with("usage: git remote add [-f] NAME URL\n"));
    assert!(message.ends_with("git: error: The following arguments are required: URL."));
}

#[test]
fn format_options_load_from_json() {
    let format = FormatOptions::from_json(r#"{"maxWidth": "50%", "compactUsage": true}"#).unwrap();
    let parser = Parser::builder()
        .prog("tool")
        .format(format)
        .terminal_width(100)
        .build()
        .unwrap();
    assert_eq!(parser.format().max_width, 50);
    assert_eq!(parser.format_usage(), "usage: tool [options]");
}

#[test]
fn parsed_output_round_trips_through_json() {
    let parsed = git()
        .try_parse_from(["remote", "add", "origin", "url"])
        .unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["commands"], serde_json::json!(["remote", "add"]));
    assert_eq!(json["arguments"]["fetch"], serde_json::json!(false));
    assert_eq!(json["command_line"][0], serde_json::json!("remote"));
}

proptest! {
    #[test]
    fn parsing_never_panics(words in prop::collection::vec("-{0,2}[a-zA-Z0-9=]{0,6}", 0..8)) {
        let parser = git();
        let _ = parser.try_parse_from(&words);
        let _ = parser.evaluate(&words);
    }

    #[test]
    fn help_lines_fit_the_configured_width(width in 40usize..160) {
        let format = FormatOptions {
            max_width: argsmith::MaxWidth::Columns(width),
            ..FormatOptions::default()
        };
        let mut parser = Parser::builder().prog("tool").format(format).build().unwrap();
        parser
            .add_argument(
                ["-o", "--output"],
                ArgumentOptions::of(ArgType::String)
                    .description("Where the results go, relative to the working directory."),
            )
            .unwrap();
        for line in parser.format_help().lines() {
            prop_assert!(line.chars().count() <= width, "{line:?} is wider than {width}");
        }
    }

    #[test]
    fn separate_column_help_fits_the_configured_width(width in 40usize..160) {
        let format = FormatOptions {
            max_width: argsmith::MaxWidth::Columns(width),
            arg_separate_cols: true,
            ..FormatOptions::default()
        };
        let mut parser = Parser::builder().prog("cc").format(format).build().unwrap();
        parser
            .add_argument(
                ["-I"],
                ArgumentOptions::of(ArgType::String)
                    .nargs(Nargs::OneOrMore)
                    .metavar("INCLUDE_DIR")
                    .description("Directories searched for headers, in the order given."),
            )
            .unwrap();
        parser
            .add_argument(
                ["-o", "--output"],
                ArgumentOptions::of(ArgType::Path).description("Where the object file goes."),
            )
            .unwrap();
        for line in parser.format_help().lines() {
            prop_assert!(line.chars().count() <= width, "{line:?} is wider than {width}");
        }
    }
}
