//! Argument arity.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How many values an argument consumes.
///
/// An argument without `Nargs` consumes exactly one value and stores it
/// directly; an argument with `Nargs` always stores a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nargs {
    /// Exactly `n` values.
    Exact(usize),
    /// `?`: zero or one value.
    Optional,
    /// `*`: any number of values.
    ZeroOrMore,
    /// `+`: at least one value.
    OneOrMore,
}

impl Nargs {
    /// Whether `count` collected values satisfy this arity.
    pub fn is_satisfied_by(self, count: usize) -> bool {
        match self {
            Nargs::Exact(n) => count == n,
            Nargs::Optional => count <= 1,
            Nargs::ZeroOrMore => true,
            Nargs::OneOrMore => count > 0,
        }
    }

    /// Whether another value may be collected after `collected` ones.
    pub fn accepts_more(self, collected: usize) -> bool {
        match self {
            Nargs::Exact(n) => collected < n,
            Nargs::Optional => collected < 1,
            Nargs::ZeroOrMore | Nargs::OneOrMore => true,
        }
    }

    /// Arities with an upper limit.
    pub fn is_bounded(self) -> bool {
        matches!(self, Nargs::Exact(_) | Nargs::Optional)
    }
}

impl FromStr for Nargs {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "?" => Ok(Nargs::Optional),
            "*" => Ok(Nargs::ZeroOrMore),
            "+" => Ok(Nargs::OneOrMore),
            other => other
                .parse::<usize>()
                .map(Nargs::Exact)
                .map_err(|_| ConfigError::InvalidNargs(s.to_string())),
        }
    }
}

impl fmt::Display for Nargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nargs::Exact(n) => write!(f, "{n}"),
            Nargs::Optional => f.write_str("?"),
            Nargs::ZeroOrMore => f.write_str("*"),
            Nargs::OneOrMore => f.write_str("+"),
        }
    }
}

impl From<usize> for Nargs {
    fn from(n: usize) -> Self {
        Nargs::Exact(n)
    }
}
