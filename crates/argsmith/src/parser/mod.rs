//! The user-facing parser.
//!
//! A [`Parser`] owns a [`Declaration`] and knows how to present it. Parsing
//! comes in two modes built on the same scan:
//!
//! - **embeddable**: [`Parser::try_parse_from`] returns structured errors and
//!   reports help/version requests in [`Parsed::system_callback`]
//! - **CLI**: [`Parser::parse_from`] prints help, version and errors with the
//!   configured writers and exits the process
//!
//! [`Parser::evaluate`] sits between the two: it decides what the CLI mode
//! would print and with which exit code, without printing or exiting.

mod builder;

pub use builder::ParserBuilder;

use tracing::{debug, warn};

use crate::error::{ConfigError, Error, ParseError, Result};
use crate::help::{HelpFormatter, ProgramInfo};
use crate::options::{
    ArgumentOptions, CallbackContext, CommandOptions, ParserOptions, ResolvedFormat,
    SectionOptions, ValueOptions,
};
use crate::parse::{scan, Parsed, Scan};
use crate::tokenize::{split_command_line, tokenize};
use crate::tree::{ArgumentId, CommandId, Declaration, SectionId, Target};
use crate::types::{SystemCallback, Value};

/// Which stream an exit message belongs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// What the command-line mode does with a set of arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Parsing succeeded and the program should go on.
    Continue(Parsed),
    /// The program should print `message` and exit with `code`.
    Exit {
        code: i32,
        message: String,
        stream: Stream,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Continue(_) => None,
            Outcome::Exit { code, .. } => Some(*code),
        }
    }
}

/// A command-line parser.
///
/// ```rust
/// use argsmith::{ArgType, ArgumentOptions, Nargs, Parser};
///
/// let mut parser = Parser::builder().prog("cp").build().unwrap();
/// parser
///     .add_argument(["-r", "--recursive"], ArgumentOptions::new())
///     .unwrap();
/// parser
///     .add_argument(
///         ["paths"],
///         ArgumentOptions::of(ArgType::Path).nargs(Nargs::OneOrMore),
///     )
///     .unwrap();
///
/// let parsed = parser.try_parse_from(["-r", "src", "dst"]).unwrap();
/// assert!(parsed.flag("recursive"));
/// assert_eq!(parsed.list("paths").len(), 2);
/// ```
#[derive(Debug)]
pub struct Parser {
    decl: Declaration,
    info: ProgramInfo,
    options: ParserOptions,
    format: ResolvedFormat,
}

impl Parser {
    /// Creates a new builder for constructing a Parser.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// A parser with default options for `prog`.
    pub fn new(prog: impl Into<String>) -> Result<Self, ConfigError> {
        ParserBuilder::new().prog(prog).build()
    }

    pub fn declaration(&self) -> &Declaration {
        &self.decl
    }

    pub fn info(&self) -> &ProgramInfo {
        &self.info
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn format(&self) -> &ResolvedFormat {
        &self.format
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    /// Declares an argument on the root command.
    pub fn add_argument<I, S>(
        &mut self,
        codes: I,
        options: ArgumentOptions,
    ) -> Result<ArgumentId, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.decl.add_argument(CommandId::ROOT.into(), codes, options)
    }

    /// Declares an argument on a command, or inside a section.
    pub fn add_argument_to<I, S>(
        &mut self,
        target: impl Into<Target>,
        codes: I,
        options: ArgumentOptions,
    ) -> Result<ArgumentId, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.decl.add_argument(target.into(), codes, options)
    }

    /// Declares a subcommand of the root command.
    pub fn add_command(
        &mut self,
        label: &str,
        options: CommandOptions,
    ) -> Result<CommandId, ConfigError> {
        self.decl.add_command(CommandId::ROOT.into(), label, options)
    }

    /// Declares a subcommand of a command, or inside a section.
    pub fn add_command_to(
        &mut self,
        target: impl Into<Target>,
        label: &str,
        options: CommandOptions,
    ) -> Result<CommandId, ConfigError> {
        self.decl.add_command(target.into(), label, options)
    }

    /// Adds a titled section to the root command.
    pub fn add_section(&mut self, title: &str, options: SectionOptions) -> SectionId {
        self.decl.add_section(CommandId::ROOT, title, options)
    }

    pub fn add_section_to(
        &mut self,
        command: CommandId,
        title: &str,
        options: SectionOptions,
    ) -> SectionId {
        self.decl.add_section(command, title, options)
    }

    pub fn add_text<I, S>(&mut self, section: SectionId, paragraphs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decl.add_text(section, paragraphs)
    }

    pub fn add_value(
        &mut self,
        argument: ArgumentId,
        value: &str,
        options: ValueOptions,
    ) -> Result<(), ConfigError> {
        self.decl.add_value(argument, value, options)
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    pub fn formatter(&self) -> HelpFormatter<'_> {
        HelpFormatter::new(&self.decl, &self.info, &self.format)
    }

    /// Help screen of the root command.
    pub fn format_help(&self) -> String {
        self.format_help_for(CommandId::ROOT)
    }

    pub fn format_help_for(&self, command: CommandId) -> String {
        self.formatter().help(command)
    }

    pub fn format_usage(&self) -> String {
        self.formatter().usage(CommandId::ROOT)
    }

    pub fn format_version(&self) -> String {
        self.formatter().version()
    }

    pub fn format_error(&self, err: &ParseError) -> String {
        self.formatter().error(err)
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    fn scan<I, S>(&self, args: I) -> Result<Scan>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect();
        let tokens = tokenize(&words, self.decl.dash_style());
        debug!(words = words.len(), tokens = tokens.len(), "parsing");
        scan(&self.decl, tokens, words)
    }

    /// Runs callbacks of supplied non-system arguments, lowest priority
    /// first. Equal priorities run in the order the arguments were supplied.
    fn run_callbacks(&self, scan: &Scan) {
        let mut arguments: Vec<_> = scan
            .callbacks
            .iter()
            .map(|id| &self.decl[*id])
            .filter(|argument| argument.arg_type().system_callback().is_none())
            .collect();
        arguments.sort_by_key(|argument| argument.settings.priority);
        for argument in arguments {
            if let Some(callback) = &argument.settings.callback {
                debug!(key = %argument.key, "running callback");
                let null = Value::Null;
                callback.call(&CallbackContext {
                    key: &argument.key,
                    value: scan.parsed.get(&argument.key).unwrap_or(&null),
                    parsed: &scan.parsed,
                });
            }
        }
    }

    /// Parses without printing or exiting.
    ///
    /// A supplied help or version option does not fail the parse: it shows
    /// up in [`Parsed::system_callback`], and the callbacks of other
    /// arguments are skipped.
    pub fn try_parse_from<I, S>(&self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scan = self.scan(args)?;
        if scan.system.is_none() {
            self.run_callbacks(&scan);
        }
        Ok(scan.parsed)
    }

    /// Splits `line` with shell quoting rules, then parses the words.
    pub fn try_parse_str(&self, line: &str) -> Result<Parsed> {
        self.try_parse_from(split_command_line(line)?)
    }

    /// Output of a supplied help or version option.
    fn system_output(&self, id: ArgumentId, parsed: &Parsed) -> String {
        let argument = &self.decl[id];
        if let Some(callback) = &argument.settings.callback {
            let null = Value::Null;
            let context = CallbackContext {
                key: &argument.key,
                value: parsed.get(&argument.key).unwrap_or(&null),
                parsed,
            };
            if let Some(output) = callback.call(&context) {
                return output;
            }
        }
        match argument.arg_type().system_callback() {
            Some(SystemCallback::Version) => self.format_version(),
            _ => self.format_help_for(parsed.command),
        }
    }

    /// Decides what the command-line mode prints and how it exits.
    pub fn evaluate<I, S>(&self, args: I) -> Outcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcome = match self.scan(args) {
            Ok(scan) => match scan.system {
                Some(id) => Outcome::Exit {
                    code: 0,
                    message: self.system_output(id, &scan.parsed),
                    stream: Stream::Out,
                },
                None => {
                    self.run_callbacks(&scan);
                    Outcome::Continue(scan.parsed)
                }
            },
            Err(Error::Parse(err)) => {
                debug!(kind = err.kind.code(), command = %err.command, "parse failed");
                Outcome::Exit {
                    code: 1,
                    message: self.format_error(&err),
                    stream: Stream::Err,
                }
            }
            Err(err) => {
                warn!(error = %err, "parser failed");
                Outcome::Exit {
                    code: 1,
                    message: self.decl.locale().fatal_error(&err.to_string()),
                    stream: Stream::Err,
                }
            }
        };
        debug!(exit = ?outcome.exit_code(), "evaluated command line");
        outcome
    }

    /// Parses `args`, or prints help, version or an error and exits.
    pub fn parse_from<I, S>(&self, args: I) -> Parsed
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.evaluate(args) {
            Outcome::Continue(parsed) => parsed,
            Outcome::Exit {
                code,
                message,
                stream,
            } => {
                let write = match stream {
                    Stream::Out => &self.options.write_out,
                    Stream::Err => &self.options.write_err,
                };
                write(&message);
                std::process::exit(code)
            }
        }
    }

    /// [`Parser::parse_from`] with the arguments of the current process.
    pub fn parse(&self) -> Parsed {
        self.parse_from(
            std::env::args_os()
                .skip(1)
                .map(|arg| arg.to_string_lossy().into_owned()),
        )
    }
}
