//! Builder for [`Parser`].

use std::rc::Rc;

use tracing::debug;

use crate::error::ConfigError;
use crate::help::ProgramInfo;
use crate::lang::{English, Locale};
use crate::options::{ArgumentOptions, FormatOptions, ParserOptions};
use crate::tokenize::DashStyle;
use crate::tree::{CommandId, Declaration};
use crate::types::ArgType;

use super::Parser;

const FALLBACK_PROG: &str = "prog";

/// Builder for configuring a [`Parser`].
///
/// ```rust
/// use argsmith::{FormatOptions, MaxWidth, Parser};
///
/// let parser = Parser::builder()
///     .prog("deploy")
///     .version("1.2.0")
///     .help(["Ship a build to an environment."])
///     .format(FormatOptions {
///         max_width: MaxWidth::Columns(60),
///         ..FormatOptions::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(parser.format_version(), "deploy 1.2.0");
/// ```
#[derive(Debug)]
pub struct ParserBuilder {
    info: ProgramInfo,
    locale: Rc<dyn Locale>,
    options: ParserOptions,
    format: FormatOptions,
    terminal_width: Option<usize>,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self {
            info: ProgramInfo {
                prog: default_prog(),
                ..ProgramInfo::default()
            },
            locale: Rc::new(English),
            options: ParserOptions::default(),
            format: FormatOptions::default(),
            terminal_width: None,
        }
    }

    /// Program name used in usage, version and error lines.
    ///
    /// Defaults to the file name of the running executable.
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.info.prog = prog.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version = Some(version.into());
        self
    }

    /// First line of the help screen.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.info.title = Some(title.into());
        self
    }

    /// Paragraphs shown after the usage line of the root help screen.
    pub fn help<I, S>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.info.help = paragraphs.into_iter().map(Into::into).collect();
        self
    }

    /// Paragraphs shown at the end of every help screen.
    pub fn epilogue<I, S>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.info.epilogue = paragraphs.into_iter().map(Into::into).collect();
        self
    }

    pub fn locale<L: Locale + 'static>(mut self, locale: L) -> Self {
        self.locale = Rc::new(locale);
        self
    }

    /// Uses a locale looked up with [`crate::locale`].
    pub fn boxed_locale(mut self, locale: Box<dyn Locale>) -> Self {
        self.locale = Rc::from(locale);
        self
    }

    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for setting [`ParserOptions::dash_style`].
    pub fn dash_style(mut self, style: DashStyle) -> Self {
        self.options.dash_style = style;
        self
    }

    pub fn format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Width percentages in [`FormatOptions::max_width`] are taken of this.
    pub fn terminal_width(mut self, width: usize) -> Self {
        self.terminal_width = Some(width);
        self
    }

    /// Takes percentages of the width of the controlling terminal, if any.
    pub fn detect_terminal_width(mut self) -> Self {
        self.terminal_width = crate::terminal::terminal_width();
        self
    }

    /// Resolves the format and creates the root command with its automatic
    /// help and version options.
    pub fn build(self) -> Result<Parser, ConfigError> {
        let format = self.format.resolve(self.terminal_width)?;
        let style = self.options.dash_style;
        let mut decl = Declaration::new(style, format.code_preference, self.locale.clone());

        if self.options.add_help {
            decl.add_argument(
                CommandId::ROOT.into(),
                prefixed(&self.locale.help_codes(), style),
                ArgumentOptions::of(ArgType::Usage)
                    .description(self.locale.help_description())
                    .key("help"),
            )?;
        }
        if self.options.add_version {
            decl.add_argument(
                CommandId::ROOT.into(),
                prefixed(&self.locale.version_codes(), style),
                ArgumentOptions::of(ArgType::Version)
                    .description(self.locale.version_description())
                    .key("version"),
            )?;
        }

        debug!(
            prog = %self.info.prog,
            max_width = format.max_width,
            locale = self.locale.code(),
            "built parser"
        );
        Ok(Parser {
            decl,
            info: self.info,
            options: self.options,
            format,
        })
    }
}

/// Turns bare code names into option codes for the dash style.
fn prefixed(names: &[String], style: DashStyle) -> Vec<String> {
    names
        .iter()
        .map(|name| match style {
            DashStyle::Double if name.chars().count() > 1 => format!("--{name}"),
            _ => format!("-{name}"),
        })
        .collect()
}

fn default_prog() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PROG.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn double_dash_codes_get_long_prefix() {
        assert_eq!(
            prefixed(&names(&["h", "help"]), DashStyle::Double),
            vec!["-h", "--help"]
        );
    }

    #[test]
    fn single_dash_codes_get_one_dash() {
        assert_eq!(
            prefixed(&names(&["h", "help"]), DashStyle::Single),
            vec!["-h", "-help"]
        );
    }

    #[test]
    fn build_adds_help_and_version() {
        let parser = ParserBuilder::new().prog("tool").build().unwrap();
        let keys: Vec<&str> = parser
            .declaration()
            .arguments_of(CommandId::ROOT)
            .map(|argument| argument.key.as_str())
            .collect();
        assert_eq!(keys, vec!["help", "version"]);
    }

    #[test]
    fn automatic_options_can_be_disabled() {
        let options = ParserOptions {
            add_help: false,
            add_version: false,
            ..ParserOptions::default()
        };
        let parser = ParserBuilder::new().options(options).build().unwrap();
        assert_eq!(parser.declaration().arguments_of(CommandId::ROOT).count(), 0);
    }

    #[test]
    fn invalid_format_fails_the_build() {
        let format = FormatOptions {
            prefer_long_codes: Some(true),
            prefer_short_codes: Some(true),
            ..FormatOptions::default()
        };
        let err = ParserBuilder::new().format(format).build().unwrap_err();
        assert_eq!(err, ConfigError::ConflictingCodePreference);
    }

    #[test]
    fn percentage_width_uses_terminal_width() {
        let format = FormatOptions {
            max_width: crate::options::MaxWidth::Percent(50.0),
            ..FormatOptions::default()
        };
        let parser = ParserBuilder::new()
            .format(format)
            .terminal_width(120)
            .build()
            .unwrap();
        assert_eq!(parser.format().max_width, 60);
    }
}
