//! Locale phrase assets.
//!
//! Every user-visible string the engine produces comes from a [`Locale`].
//! Structural joiners have defaults; a locale only has to supply phrases.

use std::fmt::Debug;

use crate::types::Nargs;

/// Phrases for one language.
pub trait Locale: Debug {
    /// Locale code, e.g. `en-US`.
    fn code(&self) -> &str;

    /// Metavar shown for path arguments.
    fn metavar_path(&self) -> &str;

    fn section_commands(&self) -> &str;
    fn section_positional(&self) -> &str;
    fn section_optional(&self) -> &str;

    /// Codes of the automatic help option, without dashes.
    fn help_codes(&self) -> Vec<String>;
    fn help_description(&self) -> &str;
    /// Codes of the automatic version option, without dashes.
    fn version_codes(&self) -> Vec<String>;
    fn version_description(&self) -> &str;

    /// The start of a usage line: program name and selected command path.
    fn usage_prefix(&self, prog: &str, path: &[String]) -> String;
    /// Stand-in for all options when usage is compacted.
    fn usage_options(&self) -> &str;
    /// Last line of an error message.
    fn error_line(&self, prog: &str, reason: &str) -> String;
    fn fatal_error(&self, detail: &str) -> String;

    fn unrecognized_arguments(&self, token: &str) -> String;
    fn expected_values(&self, argument: &str, nargs: Option<Nargs>) -> String;
    fn invalid_value_type(&self, argument: &str, type_name: &str, values: &[String]) -> String;
    fn invalid_value_choice(&self, argument: &str, accepted: &[String], values: &[String])
        -> String;
    fn missing_arguments(&self, arguments: &[String]) -> String;

    fn version_line(&self, prog: &str, version: &str) -> String {
        format!("{prog} {version}")
    }

    fn brackets(&self, s: &str) -> String {
        format!("[{s}]")
    }

    fn ellipsis(&self, s: &str) -> String {
        format!("{s}...")
    }

    /// Line describing one accepted value.
    fn value_line(&self, value: &str, description: &str) -> String {
        if description.is_empty() {
            format!("- {value}")
        } else {
            format!("- {value}: {description}")
        }
    }

    fn join_codes(&self, codes: &[String]) -> String {
        codes.join(", ")
    }

    fn join_metavars(&self, metavars: &[String]) -> String {
        metavars.join(" ")
    }

    /// Quoted, comma separated list of values for error messages.
    fn join_values(&self, values: &[String]) -> String {
        values
            .iter()
            .map(|v| format!("'{v}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Default metavar for a code: leading dashes stripped, upper-cased.
    fn to_metavar(&self, code: &str) -> String {
        code.trim_start_matches('-').to_uppercase()
    }
}

/// US English.
#[derive(Clone, Copy, Debug, Default)]
pub struct English;

impl Locale for English {
    fn code(&self) -> &str {
        "en-US"
    }

    fn metavar_path(&self) -> &str {
        "PATH"
    }

    fn section_commands(&self) -> &str {
        "Commands:"
    }

    fn section_positional(&self) -> &str {
        "Positional arguments:"
    }

    fn section_optional(&self) -> &str {
        "Optional arguments:"
    }

    fn help_codes(&self) -> Vec<String> {
        vec!["h".into(), "help".into()]
    }

    fn help_description(&self) -> &str {
        "Show this help message and exit."
    }

    fn version_codes(&self) -> Vec<String> {
        vec!["v".into(), "version".into()]
    }

    fn version_description(&self) -> &str {
        "Show program's version number and exit."
    }

    fn usage_prefix(&self, prog: &str, path: &[String]) -> String {
        let mut line = format!("usage: {prog}");
        for command in path {
            line.push(' ');
            line.push_str(command);
        }
        line
    }

    fn usage_options(&self) -> &str {
        "[options]"
    }

    fn error_line(&self, prog: &str, reason: &str) -> String {
        format!("{prog}: error: {reason}.")
    }

    fn fatal_error(&self, detail: &str) -> String {
        format!("A fatal error occurred: {detail}")
    }

    fn unrecognized_arguments(&self, token: &str) -> String {
        format!("Unrecognized arguments: {token}")
    }

    fn expected_values(&self, argument: &str, nargs: Option<Nargs>) -> String {
        match nargs.unwrap_or(Nargs::Exact(1)) {
            Nargs::Exact(1) => format!("Argument {argument}: expected 1 argument"),
            Nargs::Exact(n) => format!("Argument {argument}: expected {n} arguments"),
            Nargs::OneOrMore => format!("Argument {argument}: expected 1 or more arguments"),
            Nargs::Optional => format!("Argument {argument}: expected 1 or 0 arguments"),
            Nargs::ZeroOrMore => format!("Argument {argument}: expected 0 or more arguments"),
        }
    }

    fn invalid_value_type(&self, argument: &str, type_name: &str, values: &[String]) -> String {
        format!(
            "Argument {argument}: invalid {type_name} value: {}",
            self.join_values(values)
        )
    }

    fn invalid_value_choice(
        &self,
        argument: &str,
        accepted: &[String],
        values: &[String],
    ) -> String {
        format!(
            "Argument {argument}: value must be one of {}: {}",
            self.join_values(accepted),
            self.join_values(values)
        )
    }

    fn missing_arguments(&self, arguments: &[String]) -> String {
        format!(
            "The following arguments are required: {}",
            arguments.join(", ")
        )
    }
}

/// Looks up a bundled locale by code. Matching ignores case and accepts a
/// bare language code.
pub fn locale(code: &str) -> Option<Box<dyn Locale>> {
    match code.to_ascii_lowercase().as_str() {
        "en" | "en-us" | "en_us" => Some(Box::new(English)),
        _ => None,
    }
}
