//! Error types for declaring and parsing arguments.
//!
//! Declaration mistakes surface as [`ConfigError`] from the call that made
//! them. Bad user input surfaces as [`ParseError`], which carries enough
//! context to render a localized message. [`InternalError`] is reserved for
//! broken engine invariants.

use std::fmt;

use thiserror::Error;

use crate::tokenize::Token;
use crate::tree::{ArgumentId, CommandId};
use crate::types::{ArgType, Nargs};

/// Errors raised while declaring arguments or configuring a parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An argument was declared without any codes.
    #[error("an argument needs at least one code")]
    EmptyCodes,

    /// A code could not be used as a single argument code.
    #[error("invalid argument code {code:?}: {reason}")]
    InvalidCode { code: String, reason: &'static str },

    /// One argument mixed option codes with a positional code.
    #[error("argument codes [{}] mix options and positionals", .codes.join(", "))]
    MixedCodes { codes: Vec<String> },

    /// A code is already registered somewhere in the declaration.
    #[error("cannot add argument with codes [{}]: argument codes already in use", .codes.join(", "))]
    DuplicateCodes { codes: Vec<String> },

    /// A key is already registered somewhere in the declaration.
    #[error("cannot add argument with key {key:?}: argument key already in use")]
    DuplicateKey { key: String },

    /// A sibling command with the same label exists.
    #[error("cannot add command {label:?}: command already exists")]
    DuplicateCommand { label: String },

    /// A command label that the tokenizer would not see as one plain word.
    #[error("invalid command label {label:?}: {reason}")]
    InvalidCommandLabel { label: String, reason: &'static str },

    /// Unknown argument type name.
    #[error("unknown argument type {0:?}")]
    UnknownType(String),

    /// Unparseable arity string.
    #[error("invalid nargs {0:?}: expected a number, \"?\", \"*\" or \"+\"")]
    InvalidNargs(String),

    /// The arity is not allowed for the argument type.
    #[error("nargs {nargs} is not permitted for {arg_type} arguments")]
    NargsNotPermitted { arg_type: ArgType, nargs: Nargs },

    /// A metavar was set on a type that takes no values.
    #[error("metavar is not permitted for {arg_type} arguments")]
    MetavarNotPermitted { arg_type: ArgType },

    /// Positional arguments always consume a value.
    #[error("positional arguments must take values, {arg_type} arguments do not")]
    PositionalWithoutValues { arg_type: ArgType },

    /// Accepted values were added to a type that takes no values.
    #[error("{arg_type} arguments do not take values")]
    ValuesNotAccepted { arg_type: ArgType },

    /// A boolean whose set value equals its default could never be observed.
    #[error("value and default value of a {arg_type} argument must differ")]
    ValueEqualsDefault { arg_type: ArgType },

    /// An option holds a value of the wrong shape.
    #[error("option {option} of a {arg_type} argument must be {expected}")]
    InvalidOptionValue {
        option: &'static str,
        arg_type: ArgType,
        expected: &'static str,
    },

    /// `preferLongCodes` and `preferShortCodes` agree with each other.
    #[error("preferLongCodes and preferShortCodes cannot both be set to the same value")]
    ConflictingCodePreference,

    /// `maxWidth` is neither a column count nor a percentage.
    #[error("invalid max width {0:?}: expected a column count or a percentage like \"80%\"")]
    InvalidWidth(String),

    /// A format option is out of range.
    #[error("invalid format option {option}: {reason}")]
    InvalidFormat { option: &'static str, reason: String },

    /// Format options could not be deserialized.
    #[error("cannot load format options: {0}")]
    Load(String),
}

/// Classification of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// An option-shaped token matched no option.
    UnknownOption,
    /// A positional token had no slot left to fill.
    UnknownArgument,
    /// An argument received a number of values its arity rejects.
    IncorrectNumberOfValues,
    /// A value failed type coercion.
    InvalidValueType,
    /// A value is not among the argument's accepted values.
    InvalidValueOpts,
    /// Required arguments were never supplied.
    MissingArguments,
}

impl ParseErrorKind {
    /// The stable upper-case code of this kind.
    pub fn code(self) -> &'static str {
        match self {
            ParseErrorKind::UnknownOption => "UNKNOWN_OPTION",
            ParseErrorKind::UnknownArgument => "UNKNOWN_ARGUMENT",
            ParseErrorKind::IncorrectNumberOfValues => "INCORRECT_NUMBER_OF_VALUES",
            ParseErrorKind::InvalidValueType => "INVALID_VALUE_TYPE",
            ParseErrorKind::InvalidValueOpts => "INVALID_VALUE_OPTS",
            ParseErrorKind::MissingArguments => "MISSING_ARGUMENTS",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A structured parse failure.
///
/// Only the fields relevant to the kind are populated; see
/// [`crate::HelpFormatter::error_reason`] for the rendered message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}{}", token_suffix(.token))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Command that was active when parsing failed.
    pub command: CommandId,
    /// Token being processed when the failure happened.
    pub token: Option<Token>,
    /// Argument the failure is attributed to.
    pub argument: Option<ArgumentId>,
    /// Offending values, raw as typed.
    pub values: Vec<String>,
    /// Accepted values, for [`ParseErrorKind::InvalidValueOpts`].
    pub accepted: Vec<String>,
    /// Required arguments left unset, for [`ParseErrorKind::MissingArguments`].
    pub missing: Vec<ArgumentId>,
}

fn token_suffix(token: &Option<Token>) -> String {
    token
        .as_ref()
        .map(|token| format!(": {}", token.original))
        .unwrap_or_default()
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, command: CommandId) -> Self {
        Self {
            kind,
            command,
            token: None,
            argument: None,
            values: Vec::new(),
            accepted: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub(crate) fn with_token(mut self, token: &Token) -> Self {
        self.token = Some(token.clone());
        self
    }

    pub(crate) fn with_argument(mut self, argument: ArgumentId) -> Self {
        self.argument = Some(argument);
        self
    }

    pub(crate) fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub(crate) fn with_accepted(mut self, accepted: Vec<String>) -> Self {
        self.accepted = accepted;
        self
    }

    pub(crate) fn with_missing(mut self, missing: Vec<ArgumentId>) -> Self {
        self.missing = missing;
        self
    }
}

/// A broken engine invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal error: {0}")]
pub struct InternalError(pub String);

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Internal(#[from] InternalError),
    /// A raw command line had unbalanced quotes or a dangling escape.
    #[error("cannot split command line: {0}")]
    CommandLine(String),
}

impl Error {
    /// The parse error, if this is one.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for argsmith operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
