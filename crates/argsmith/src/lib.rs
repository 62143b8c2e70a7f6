//! # argsmith - Declarative Command-Line Parsing
//!
//! `argsmith` turns a declaration of commands, sections and arguments into a
//! parser and a column-aligned help screen that reads the same at any
//! terminal width.
//!
//! ## Core Concepts
//!
//! - [`Parser`]: owns the declaration and exposes the parse entry points
//! - [`ArgType`]: what an argument does (flag, counter, value, help, ...)
//! - [`Nargs`]: how many values an argument takes
//! - [`Parsed`]: the values of the selected command, by key
//! - [`FormatOptions`]: help layout, loadable from JSON or YAML
//! - [`Locale`]: every user-visible phrase
//!
//! ## Quick Start
//!
//! ```rust
//! use argsmith::{ArgType, ArgumentOptions, CommandOptions, Parser};
//!
//! let mut parser = Parser::builder()
//!     .prog("todo")
//!     .version("0.4.1")
//!     .build()
//!     .unwrap();
//! parser
//!     .add_argument(
//!         ["-V", "--verbose"],
//!         ArgumentOptions::of(ArgType::Count).description("Print more."),
//!     )
//!     .unwrap();
//! let add = parser
//!     .add_command("add", CommandOptions::new().description("Add a task."))
//!     .unwrap();
//! parser
//!     .add_argument_to(add, ["title"], ArgumentOptions::new())
//!     .unwrap();
//!
//! let parsed = parser
//!     .try_parse_from(["-VV", "add", "water the plants"])
//!     .unwrap();
//! assert_eq!(parsed.commands, vec!["add"]);
//! assert_eq!(parsed.count("verbose"), 2);
//! assert_eq!(parsed.string("title"), Some("water the plants"));
//!
//! let help = parser.format_help();
//! assert!(help.starts_with("usage: todo [-h] [-v] [-V]"));
//! assert!(help.contains("Commands:"));
//! ```
//!
//! ## Parsing Modes
//!
//! [`Parser::try_parse_from`] never prints and never exits: failures come
//! back as [`Error`] and a supplied `--help` shows up in
//! [`Parsed::system_callback`]. [`Parser::parse_from`] and [`Parser::parse`]
//! behave like a command-line program: they print help, version or the
//! error and exit the process. [`Parser::evaluate`] returns what those would
//! do as an [`Outcome`].
//!
//! ## Help Layout
//!
//! Widths in [`FormatOptions`] are either columns (`>= 1`) or a share of the
//! total width (`< 1`):
//!
//! ```rust
//! use argsmith::FormatOptions;
//!
//! let format = FormatOptions::from_yaml("maxWidth: 100\nargColMaximumWidth: 0.4").unwrap();
//! let resolved = format.resolve(None).unwrap();
//! assert_eq!(resolved.arg_col_maximum_width, 40);
//! ```

mod error;
mod help;
mod lang;
mod nargs;
mod options;
mod parse;
mod parser;
mod terminal;
mod tokenize;
mod tree;
mod types;
mod value;

pub use error::{ConfigError, Error, InternalError, ParseError, ParseErrorKind, Result};
pub use help::{HelpFormatter, ProgramInfo};
pub use lang::{locale, English, Locale};
pub use nargs::Nargs;
pub use options::{
    resolve_argument, resolve_fraction, ArgumentOptions, ArgumentSettings, Callback,
    CallbackContext, CodePreference, CommandOptions, FormatOptions, MaxWidth, ParserOptions,
    ResolvedFormat, SectionOptions, ValueOptions, Writer,
};
pub use parse::Parsed;
pub use parser::{Outcome, Parser, ParserBuilder, Stream};
pub use terminal::terminal_width;
pub use tokenize::{classify_code, split_command_line, tokenize, DashStyle, Token, TokenKind};
pub use tree::{
    AcceptedValue, Argument, ArgumentId, Code, Command, CommandId, CommandScope, Declaration,
    RootSections, Section, SectionId, SectionItem, SectionKind, Target,
};
pub use types::{
    defaults, describe, ArgType, SystemCallback, TypeDefaults, TypeDescriptor, TypeProperties,
};
pub use value::Value;

// Re-export the layout crate for callers that render their own tables.
pub use argsmith_render as render;
