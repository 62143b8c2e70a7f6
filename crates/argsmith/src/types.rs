//! The closed registry of argument types.
//!
//! Each [`ArgType`] has a static [`TypeDescriptor`] with its properties and
//! value coercion, plus a set of [`TypeDefaults`] that depend on the locale.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::lang::Locale;
pub use crate::nargs::Nargs;
pub use crate::value::Value;

/// Argument types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgType {
    /// A flag that stores a fixed value when present.
    Boolean,
    /// A flag that adds to a counter each time it appears.
    Count,
    /// One or more base-10 integers.
    Integer,
    /// One or more filesystem paths.
    Path,
    /// One or more strings.
    String,
    /// Prints usage and exits.
    Usage,
    /// Prints the program version and exits.
    Version,
}

impl ArgType {
    pub const ALL: [ArgType; 7] = [
        ArgType::Boolean,
        ArgType::Count,
        ArgType::Integer,
        ArgType::Path,
        ArgType::String,
        ArgType::Usage,
        ArgType::Version,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArgType::Boolean => "boolean",
            ArgType::Count => "count",
            ArgType::Integer => "integer",
            ArgType::Path => "path",
            ArgType::String => "string",
            ArgType::Usage => "usage",
            ArgType::Version => "version",
        }
    }

    pub fn descriptor(self) -> &'static TypeDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn properties(self) -> TypeProperties {
        self.descriptor().properties
    }

    pub fn accepts_values(self) -> bool {
        self.properties().accepts_values
    }

    pub fn system_callback(self) -> Option<SystemCallback> {
        self.properties().system_callback
    }

    /// Converts a raw string into a value of this type.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        (self.descriptor().coerce)(raw)
    }

    /// Whether `nargs` may be configured on this type.
    pub fn permits_nargs(self, nargs: Option<Nargs>) -> bool {
        match (self, nargs) {
            (_, None) => true,
            (ArgType::Count, Some(Nargs::Exact(0))) => true,
            (_, Some(Nargs::Exact(0))) => false,
            (ty, Some(_)) => ty.accepts_values(),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArgType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ConfigError::UnknownType(s.to_string()))
    }
}

/// Built-in behavior that replaces normal parsing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemCallback {
    /// Show the help screen.
    Usage,
    /// Show the version line.
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeProperties {
    /// Whether the argument consumes values from the command line.
    pub accepts_values: bool,
    pub system_callback: Option<SystemCallback>,
}

impl TypeProperties {
    const VALUES: TypeProperties = TypeProperties {
        accepts_values: true,
        system_callback: None,
    };
    const FLAG: TypeProperties = TypeProperties {
        accepts_values: false,
        system_callback: None,
    };
}

/// Static description of a type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub arg_type: ArgType,
    pub properties: TypeProperties,
    /// `None` when the raw string is not a valid value.
    pub coerce: fn(&str) -> Option<Value>,
}

fn no_values(_: &str) -> Option<Value> {
    None
}

fn coerce_integer(raw: &str) -> Option<Value> {
    raw.parse::<i64>().ok().map(Value::Int)
}

fn coerce_path(raw: &str) -> Option<Value> {
    (!raw.is_empty()).then(|| Value::Path(PathBuf::from(raw)))
}

fn coerce_string(raw: &str) -> Option<Value> {
    Some(Value::Str(raw.to_string()))
}

// Indexed by `ArgType as usize`.
static DESCRIPTORS: [TypeDescriptor; 7] = [
    TypeDescriptor {
        arg_type: ArgType::Boolean,
        properties: TypeProperties::FLAG,
        coerce: no_values,
    },
    TypeDescriptor {
        arg_type: ArgType::Count,
        properties: TypeProperties::FLAG,
        coerce: no_values,
    },
    TypeDescriptor {
        arg_type: ArgType::Integer,
        properties: TypeProperties::VALUES,
        coerce: coerce_integer,
    },
    TypeDescriptor {
        arg_type: ArgType::Path,
        properties: TypeProperties::VALUES,
        coerce: coerce_path,
    },
    TypeDescriptor {
        arg_type: ArgType::String,
        properties: TypeProperties::VALUES,
        coerce: coerce_string,
    },
    TypeDescriptor {
        arg_type: ArgType::Usage,
        properties: TypeProperties {
            accepts_values: false,
            system_callback: Some(SystemCallback::Usage),
        },
        coerce: no_values,
    },
    TypeDescriptor {
        arg_type: ArgType::Version,
        properties: TypeProperties {
            accepts_values: false,
            system_callback: Some(SystemCallback::Version),
        },
        coerce: no_values,
    },
];

/// Looks up a type by name.
pub fn describe(name: &str) -> Result<&'static TypeDescriptor, ConfigError> {
    name.parse::<ArgType>().map(ArgType::descriptor)
}

/// Per-type option defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDefaults {
    /// Value stored when a flag is present.
    pub value: Value,
    /// Value reported when the argument never appears.
    pub default_value: Value,
    pub nargs: Option<Nargs>,
    /// Metavar override; `None` derives it from the primary code.
    pub metavar: Option<Vec<String>>,
}

/// Defaults for `arg_type`. The path metavar comes from the locale.
pub fn defaults(arg_type: ArgType, locale: &dyn Locale) -> TypeDefaults {
    let mut defaults = TypeDefaults {
        value: Value::Null,
        default_value: Value::Null,
        nargs: None,
        metavar: None,
    };
    match arg_type {
        ArgType::Boolean => {
            defaults.value = Value::Bool(true);
            defaults.default_value = Value::Bool(false);
        }
        ArgType::Count => {
            defaults.value = Value::Int(1);
            defaults.default_value = Value::Int(0);
        }
        ArgType::Integer => defaults.default_value = Value::Int(0),
        ArgType::Path => {
            defaults.nargs = Some(Nargs::Exact(1));
            defaults.metavar = Some(vec![locale.metavar_path().to_string()]);
        }
        ArgType::String | ArgType::Usage | ArgType::Version => {}
    }
    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::English;

    #[test]
    fn descriptors_are_indexed_by_type() {
        for ty in ArgType::ALL {
            assert_eq!(ty.descriptor().arg_type, ty);
        }
    }

    #[test]
    fn describe_rejects_unknown_names() {
        assert_eq!(describe("count").unwrap().arg_type, ArgType::Count);
        assert_eq!(
            describe("float").unwrap_err(),
            ConfigError::UnknownType("float".into())
        );
    }

    #[test]
    fn flags_take_no_values() {
        assert!(!ArgType::Boolean.accepts_values());
        assert!(!ArgType::Count.accepts_values());
        assert!(!ArgType::Usage.accepts_values());
        assert!(ArgType::Integer.accepts_values());
        assert!(ArgType::Path.accepts_values());
    }

    #[test]
    fn system_types_carry_callbacks() {
        assert_eq!(ArgType::Usage.system_callback(), Some(SystemCallback::Usage));
        assert_eq!(
            ArgType::Version.system_callback(),
            Some(SystemCallback::Version)
        );
        assert_eq!(ArgType::String.system_callback(), None);
    }

    #[test]
    fn integer_coercion_is_strict() {
        assert_eq!(ArgType::Integer.coerce("42"), Some(Value::Int(42)));
        assert_eq!(ArgType::Integer.coerce("-7"), Some(Value::Int(-7)));
        assert_eq!(ArgType::Integer.coerce("4x"), None);
        assert_eq!(ArgType::Integer.coerce("1.5"), None);
    }

    #[test]
    fn path_coercion_rejects_empty() {
        assert_eq!(
            ArgType::Path.coerce("out.txt"),
            Some(Value::Path(PathBuf::from("out.txt")))
        );
        assert_eq!(ArgType::Path.coerce(""), None);
    }

    #[test]
    fn nargs_permissions() {
        assert!(ArgType::Boolean.permits_nargs(None));
        assert!(!ArgType::Boolean.permits_nargs(Some(Nargs::Exact(1))));
        assert!(ArgType::Count.permits_nargs(Some(Nargs::Exact(0))));
        assert!(!ArgType::Count.permits_nargs(Some(Nargs::OneOrMore)));
        assert!(ArgType::String.permits_nargs(Some(Nargs::ZeroOrMore)));
        assert!(!ArgType::String.permits_nargs(Some(Nargs::Exact(0))));
        assert!(!ArgType::Usage.permits_nargs(Some(Nargs::Optional)));
    }

    #[test]
    fn defaults_follow_type() {
        let boolean = defaults(ArgType::Boolean, &English);
        assert_eq!(boolean.value, Value::Bool(true));
        assert_eq!(boolean.default_value, Value::Bool(false));

        let count = defaults(ArgType::Count, &English);
        assert_eq!(count.value, Value::Int(1));
        assert_eq!(count.default_value, Value::Int(0));

        let path = defaults(ArgType::Path, &English);
        assert_eq!(path.nargs, Some(Nargs::Exact(1)));
        assert_eq!(path.metavar, Some(vec!["PATH".to_string()]));

        assert_eq!(defaults(ArgType::Integer, &English).default_value, Value::Int(0));
    }
}
