//! Splitting and classifying command-line words.
//!
//! The parser never looks at raw words; it consumes [`Token`]s that already
//! know whether they are options or positionals. Declared argument codes go
//! through the same classification so that a code matches exactly the
//! tokens a user would type for it.

use crate::error::{ConfigError, Error};

/// How option words are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DashStyle {
    /// `-s` short options (combinable as `-abc`) and `--long` options.
    #[default]
    Double,
    /// Every option takes a single dash, e.g. `-v` and `-verbose`.
    Single,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Positional,
    ShortOption,
    LongOption,
}

impl TokenKind {
    pub fn is_option(self) -> bool {
        !matches!(self, TokenKind::Positional)
    }
}

/// A classified word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// The token text, dashes included for options.
    pub content: String,
    /// The word the token came from. Differs from `content` for unpacked
    /// short options and `--name=value` words.
    pub original: String,
    pub kind: TokenKind,
    /// Set on the value half of a `--name=value` word.
    pub attached: bool,
}

impl Token {
    pub fn new(content: impl Into<String>, original: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            content: content.into(),
            original: original.into(),
            kind,
            attached: false,
        }
    }

    /// The value of a `--name=value` word, bound to the option before it.
    pub fn attached(value: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            attached: true,
            ..Self::new(value, original, TokenKind::Positional)
        }
    }

    pub fn is_option(&self) -> bool {
        self.kind.is_option()
    }

    /// The content without leading dashes.
    pub fn name(&self) -> &str {
        self.content.trim_start_matches('-')
    }
}

/// Words such as `-5` or `-0.25` are values, not options.
fn is_negative_number(word: &str) -> bool {
    word.strip_prefix('-').is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') && rest.parse::<f64>().is_ok()
    })
}

fn option_kind(word: &str, style: DashStyle) -> TokenKind {
    match style {
        DashStyle::Double if word.starts_with("--") => TokenKind::LongOption,
        DashStyle::Double => TokenKind::ShortOption,
        DashStyle::Single if word.chars().count() > 2 => TokenKind::LongOption,
        DashStyle::Single => TokenKind::ShortOption,
    }
}

/// Classifies a list of words.
///
/// - everything after a bare `--` is positional (the `--` itself is dropped)
/// - `-` alone and negative numbers are positional
/// - `--name=value` becomes an option token followed by a positional token
/// - with [`DashStyle::Double`], `-abc` unpacks to `-a -b -c`
pub fn tokenize<I, S>(args: I, style: DashStyle) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    let mut terminated = false;

    for arg in args {
        let word = arg.as_ref();
        if terminated || word == "-" || !word.starts_with('-') || is_negative_number(word) {
            tokens.push(Token::new(word, word, TokenKind::Positional));
            continue;
        }
        if word == "--" {
            terminated = true;
            continue;
        }
        if let Some((name, value)) = word.split_once('=') {
            tokens.push(Token::new(name, word, option_kind(name, style)));
            tokens.push(Token::attached(value, word));
            continue;
        }
        let kind = option_kind(word, style);
        if kind == TokenKind::ShortOption && word.chars().count() > 2 {
            for c in word.chars().skip(1) {
                tokens.push(Token::new(format!("-{c}"), word, TokenKind::ShortOption));
            }
            continue;
        }
        tokens.push(Token::new(word, word, kind));
    }
    tokens
}

/// Classifies one declared argument code.
///
/// A code must stand for exactly one token as a user would type it.
pub fn classify_code(code: &str, style: DashStyle) -> Result<Token, ConfigError> {
    let invalid = |reason| ConfigError::InvalidCode {
        code: code.to_string(),
        reason,
    };

    if code.is_empty() {
        return Err(invalid("code is empty"));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(invalid("code contains whitespace"));
    }
    if code == "-" || code == "--" {
        return Err(invalid("code is reserved"));
    }
    if is_negative_number(code) {
        return Err(invalid("code looks like a negative number"));
    }
    if code.starts_with('-') && code.contains('=') {
        return Err(invalid("option code contains '='"));
    }
    if style == DashStyle::Single && code.starts_with("--") {
        return Err(invalid("long options are not available with single-dash options"));
    }

    let mut tokens = tokenize([code], style);
    match (tokens.pop(), tokens.is_empty()) {
        (Some(token), true) => Ok(token),
        _ => Err(invalid("code expands to multiple tokens")),
    }
}

/// Splits a raw command line into words using shell quoting rules.
pub fn split_command_line(line: &str) -> Result<Vec<String>, Error> {
    shell_words::split(line).map_err(|err| Error::CommandLine(err.to_string()))
}
