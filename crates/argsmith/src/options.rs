//! Declaration and formatting options.
//!
//! Caller-facing option structs are sparse: unset fields fall back to the
//! type defaults from [`crate::types::defaults`]. Resolution merges them and
//! rejects combinations that could never parse.

use std::fmt;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use argsmith_render::WidthMode;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lang::Locale;
use crate::parse::Parsed;
use crate::tokenize::DashStyle;
use crate::types::{defaults, ArgType, Nargs, Value};

const DEFAULT_PRIORITY: i32 = 1000;
const FALLBACK_TERMINAL_WIDTH: usize = 80;

/// What a callback gets to see.
#[derive(Debug)]
pub struct CallbackContext<'a> {
    /// Key of the argument the callback belongs to.
    pub key: &'a str,
    pub value: &'a Value,
    pub parsed: &'a Parsed,
}

type CallbackFn = dyn Fn(&CallbackContext<'_>) -> Option<String>;

/// An action attached to an argument.
///
/// On usage and version arguments a returned string replaces the default
/// output. On other arguments the return value is ignored.
#[derive(Clone)]
pub struct Callback(Rc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CallbackContext<'_>) -> Option<String> + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, context: &CallbackContext<'_>) -> Option<String> {
        (self.0)(context)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Options for a new argument.
#[derive(Clone, Debug, Default)]
pub struct ArgumentOptions {
    pub kind: Option<ArgType>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub default_value: Option<Value>,
    /// Metavars shown in help. An empty list hides them.
    pub metavar: Option<Vec<String>>,
    pub nargs: Option<Nargs>,
    pub required: Option<bool>,
    pub key: Option<String>,
    /// Callbacks of lower priority run first. Defaults to 1000.
    pub priority: Option<i32>,
    pub callback: Option<Callback>,
}

impl ArgumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options preset to a type.
    pub fn of(kind: ArgType) -> Self {
        Self::new().kind(kind)
    }

    pub fn kind(mut self, kind: ArgType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(vec![metavar.into()]);
        self
    }

    pub fn metavars<I, S>(mut self, metavars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metavar = Some(metavars.into_iter().map(Into::into).collect());
        self
    }

    pub fn hide_metavar(mut self) -> Self {
        self.metavar = Some(Vec::new());
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallbackContext<'_>) -> Option<String> + 'static,
    {
        self.callback = Some(Callback::new(f));
        self
    }
}

/// Argument options after merging with type defaults.
#[derive(Clone, Debug)]
pub struct ArgumentSettings {
    pub arg_type: ArgType,
    pub description: Option<String>,
    pub value: Value,
    pub default_value: Value,
    /// `None` derives the metavar from the primary code.
    pub metavar: Option<Vec<String>>,
    pub nargs: Option<Nargs>,
    pub required: bool,
    pub priority: i32,
    pub callback: Option<Callback>,
}

impl ArgumentSettings {
    /// The value an argument reports when it never appears.
    pub fn initial_value(&self) -> Value {
        match self.nargs {
            Some(_) if self.arg_type.accepts_values() => Value::List(Vec::new()),
            _ => self.default_value.clone(),
        }
    }
}

/// Merges caller options over type defaults and validates the result.
pub fn resolve_argument(
    options: ArgumentOptions,
    is_option: bool,
    locale: &dyn Locale,
) -> Result<ArgumentSettings, ConfigError> {
    let arg_type = options.kind.unwrap_or(if is_option {
        ArgType::Boolean
    } else {
        ArgType::String
    });
    if !is_option && !arg_type.accepts_values() {
        return Err(ConfigError::PositionalWithoutValues { arg_type });
    }

    let defaults = defaults(arg_type, locale);
    let nargs = options.nargs.or(defaults.nargs);
    if let Some(nargs) = nargs {
        if !arg_type.permits_nargs(Some(nargs)) {
            return Err(ConfigError::NargsNotPermitted { arg_type, nargs });
        }
    }

    let value = options.value.unwrap_or(defaults.value);
    let default_value = options.default_value.unwrap_or(defaults.default_value);
    match arg_type {
        ArgType::Boolean => {
            if value.as_bool().is_none() || default_value.as_bool().is_none() {
                return Err(ConfigError::InvalidOptionValue {
                    option: "value",
                    arg_type,
                    expected: "a boolean",
                });
            }
            if value == default_value {
                return Err(ConfigError::ValueEqualsDefault { arg_type });
            }
        }
        ArgType::Count => {
            if value.as_int().is_none() || default_value.as_int().is_none() {
                return Err(ConfigError::InvalidOptionValue {
                    option: "value",
                    arg_type,
                    expected: "an integer",
                });
            }
        }
        _ => {}
    }

    let metavar = match options.metavar {
        Some(metavar) if !metavar.is_empty() && !arg_type.accepts_values() => {
            return Err(ConfigError::MetavarNotPermitted { arg_type });
        }
        Some(metavar) => Some(metavar),
        None => defaults.metavar,
    };

    let optional_arity = matches!(nargs, Some(Nargs::ZeroOrMore | Nargs::Optional));
    let required = options
        .required
        .unwrap_or(!is_option && !optional_arity);

    Ok(ArgumentSettings {
        arg_type,
        description: options.description,
        value,
        default_value,
        metavar,
        nargs,
        required,
        priority: options.priority.unwrap_or(DEFAULT_PRIORITY),
        callback: options.callback,
    })
}

/// Options for a new command.
#[derive(Clone, Debug, Default)]
pub struct CommandOptions {
    pub description: Option<String>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Options for a new section.
#[derive(Clone, Debug, Default)]
pub struct SectionOptions {
    pub description: Option<String>,
}

impl SectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Options for an accepted value.
#[derive(Clone, Debug, Default)]
pub struct ValueOptions {
    pub description: Option<String>,
}

impl ValueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Destination for rendered output.
pub type Writer = Rc<dyn Fn(&str)>;

/// Parser-level behavior.
#[derive(Clone)]
pub struct ParserOptions {
    /// Add `-h/--help`.
    pub add_help: bool,
    /// Add `-v/--version`.
    pub add_version: bool,
    pub dash_style: DashStyle,
    pub write_out: Writer,
    pub write_err: Writer,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            add_help: true,
            add_version: true,
            dash_style: DashStyle::Double,
            write_out: Rc::new(|text| {
                let _ = writeln!(std::io::stdout(), "{text}");
            }),
            write_err: Rc::new(|text| {
                let _ = writeln!(std::io::stderr(), "{text}");
            }),
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("add_help", &self.add_help)
            .field("add_version", &self.add_version)
            .field("dash_style", &self.dash_style)
            .finish_non_exhaustive()
    }
}

/// Total help width: a column count or a share of the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaxWidthRaw", into = "MaxWidthRaw")]
pub enum MaxWidth {
    Columns(usize),
    /// Percentage of the terminal width.
    Percent(f64),
}

impl Default for MaxWidth {
    fn default() -> Self {
        MaxWidth::Columns(80)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MaxWidthRaw {
    Columns(usize),
    Text(String),
}

impl From<MaxWidth> for MaxWidthRaw {
    fn from(width: MaxWidth) -> Self {
        match width {
            MaxWidth::Columns(n) => MaxWidthRaw::Columns(n),
            MaxWidth::Percent(p) => MaxWidthRaw::Text(format!("{p}%")),
        }
    }
}

impl TryFrom<MaxWidthRaw> for MaxWidth {
    type Error = ConfigError;

    fn try_from(raw: MaxWidthRaw) -> Result<Self, Self::Error> {
        match raw {
            MaxWidthRaw::Columns(n) => Ok(MaxWidth::Columns(n)),
            MaxWidthRaw::Text(s) => s.parse(),
        }
    }
}

impl FromStr for MaxWidth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidWidth(s.to_string());
        match s.strip_suffix('%') {
            Some(percent) => {
                let percent: f64 = percent.trim().parse().map_err(|_| invalid())?;
                if percent.is_finite() && percent > 0.0 {
                    Ok(MaxWidth::Percent(percent))
                } else {
                    Err(invalid())
                }
            }
            None => s.parse().map(MaxWidth::Columns).map_err(|_| invalid()),
        }
    }
}

impl MaxWidth {
    /// Resolves to columns. A percentage without a known terminal width is
    /// taken of 80 columns.
    pub fn resolve(self, terminal_width: Option<usize>) -> usize {
        match self {
            MaxWidth::Columns(n) => n,
            MaxWidth::Percent(p) => {
                let total = terminal_width.unwrap_or(FALLBACK_TERMINAL_WIDTH) as f64;
                (total * p / 100.0).round() as usize
            }
        }
    }
}

/// Which code names an argument when only one is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CodePreference {
    #[default]
    Long,
    Short,
}

/// Help layout options.
///
/// Width-like fields accept either an absolute column count (`>= 1`) or a
/// fraction of `max_width` (`< 1`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    pub max_width: MaxWidth,
    /// Blank lines between help blocks.
    pub paragraph_margin: f64,
    pub arg_start_indent: f64,
    pub arg_desc_col_gap: f64,
    pub arg_value_indent: f64,
    pub arg_value_desc_indent: f64,
    pub arg_col_minimum_width: f64,
    pub arg_col_maximum_width: f64,
    pub arg_col_overshoot: f64,
    pub usage_col_gap: f64,
    /// List options as a single placeholder in the usage line.
    pub compact_usage: bool,
    /// Put short and long codes in separate columns.
    pub arg_separate_cols: bool,
    /// Print the metavar once, after the last code.
    pub compact_metavars: bool,
    pub use_visual_width: bool,
    /// Errors show only the usage line instead of the full help.
    pub use_abbreviated_error: bool,
    pub prefer_long_codes: Option<bool>,
    pub prefer_short_codes: Option<bool>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_width: MaxWidth::default(),
            paragraph_margin: 1.0,
            arg_start_indent: 2.0,
            arg_desc_col_gap: 2.0,
            arg_value_indent: 4.0,
            arg_value_desc_indent: 2.0,
            arg_col_minimum_width: 0.175,
            arg_col_maximum_width: 0.35,
            arg_col_overshoot: 0.05,
            usage_col_gap: 1.0,
            compact_usage: false,
            arg_separate_cols: false,
            compact_metavars: false,
            use_visual_width: true,
            use_abbreviated_error: true,
            prefer_long_codes: None,
            prefer_short_codes: None,
        }
    }
}

/// Format options with every width resolved to columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub max_width: usize,
    pub paragraph_margin: usize,
    pub arg_start_indent: usize,
    pub arg_desc_col_gap: usize,
    pub arg_value_indent: usize,
    pub arg_value_desc_indent: usize,
    pub arg_col_minimum_width: usize,
    pub arg_col_maximum_width: usize,
    pub arg_col_overshoot: usize,
    pub usage_col_gap: usize,
    pub compact_usage: bool,
    pub arg_separate_cols: bool,
    pub compact_metavars: bool,
    pub width_mode: WidthMode,
    pub use_abbreviated_error: bool,
    pub code_preference: CodePreference,
}

impl Default for ResolvedFormat {
    fn default() -> Self {
        FormatOptions::default().resolved_for_defaults()
    }
}

/// Absolute values (`>= 1`, or exactly 0) are floored, fractions are taken
/// of `max_width`.
pub fn resolve_fraction(value: f64, max_width: usize) -> usize {
    if value >= 1.0 || value == 0.0 {
        value.floor() as usize
    } else {
        (value * max_width as f64).round() as usize
    }
}

impl FormatOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Load(err.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|err| ConfigError::Load(err.to_string()))
    }

    /// The code preference implied by `prefer_long_codes`/`prefer_short_codes`.
    pub fn code_preference(&self) -> Result<CodePreference, ConfigError> {
        match (self.prefer_long_codes, self.prefer_short_codes) {
            (Some(long), Some(short)) if long == short => {
                Err(ConfigError::ConflictingCodePreference)
            }
            (Some(false), _) | (_, Some(true)) => Ok(CodePreference::Short),
            _ => Ok(CodePreference::Long),
        }
    }

    /// Validates and resolves every width against the total width.
    pub fn resolve(&self, terminal_width: Option<usize>) -> Result<ResolvedFormat, ConfigError> {
        let code_preference = self.code_preference()?;
        let max_width = self.max_width.resolve(terminal_width);
        if max_width == 0 {
            return Err(ConfigError::InvalidWidth(format!("{:?}", self.max_width)));
        }

        let fields = [
            ("paragraphMargin", self.paragraph_margin),
            ("argStartIndent", self.arg_start_indent),
            ("argDescColGap", self.arg_desc_col_gap),
            ("argValueIndent", self.arg_value_indent),
            ("argValueDescIndent", self.arg_value_desc_indent),
            ("argColMinimumWidth", self.arg_col_minimum_width),
            ("argColMaximumWidth", self.arg_col_maximum_width),
            ("argColOvershoot", self.arg_col_overshoot),
            ("usageColGap", self.usage_col_gap),
        ];
        for (option, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidFormat {
                    option,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }

        let resolved = self.resolve_unchecked(max_width, code_preference);
        if resolved.arg_col_minimum_width > resolved.arg_col_maximum_width {
            return Err(ConfigError::InvalidFormat {
                option: "argColMinimumWidth",
                reason: "exceeds argColMaximumWidth".to_string(),
            });
        }
        if resolved.arg_col_maximum_width >= max_width {
            return Err(ConfigError::InvalidFormat {
                option: "argColMaximumWidth",
                reason: format!("must be narrower than the total width of {max_width}"),
            });
        }
        Ok(resolved)
    }

    fn resolve_unchecked(&self, max_width: usize, code_preference: CodePreference) -> ResolvedFormat {
        let fraction = |value: f64| resolve_fraction(value, max_width);
        ResolvedFormat {
            max_width,
            paragraph_margin: fraction(self.paragraph_margin),
            arg_start_indent: fraction(self.arg_start_indent),
            arg_desc_col_gap: fraction(self.arg_desc_col_gap),
            arg_value_indent: fraction(self.arg_value_indent),
            arg_value_desc_indent: fraction(self.arg_value_desc_indent),
            arg_col_minimum_width: fraction(self.arg_col_minimum_width),
            arg_col_maximum_width: fraction(self.arg_col_maximum_width),
            arg_col_overshoot: fraction(self.arg_col_overshoot),
            usage_col_gap: fraction(self.usage_col_gap),
            compact_usage: self.compact_usage,
            arg_separate_cols: self.arg_separate_cols,
            compact_metavars: self.compact_metavars,
            width_mode: WidthMode::from_visual(self.use_visual_width),
            use_abbreviated_error: self.use_abbreviated_error,
            code_preference,
        }
    }

    fn resolved_for_defaults(&self) -> ResolvedFormat {
        self.resolve_unchecked(self.max_width.resolve(None), CodePreference::Long)
    }
}
