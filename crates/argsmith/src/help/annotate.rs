//! Summaries and measurements of declared items, the input to layout.

use argsmith_render::non_breaking;

use crate::lang::Locale;
use crate::options::ResolvedFormat;
use crate::tree::{Argument, Code, Command};
use crate::types::Nargs;

/// Which rendering of a `*` metavar to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MetavarForm {
    /// `[FOO [FOO ...]]`
    Full,
    /// `[FOO ...]`
    Short,
}

/// The metavar string of an argument, shaped by its arity.
///
/// Metavars are used positionally; when an arity asks for more metavars
/// than were declared the last one repeats.
pub(crate) fn metavar_string(argument: &Argument, locale: &dyn Locale, form: MetavarForm) -> String {
    let metavars = &argument.metavars;
    if metavars.is_empty() || !argument.accepts_values() {
        return String::new();
    }
    let first = nth(metavars, 0);
    let repeat = || {
        let more = locale.brackets(&locale.ellipsis(&format!("{first} ")));
        format!("{first} {more}")
    };

    match argument.nargs() {
        None => first.to_string(),
        Some(Nargs::Exact(n)) => {
            let parts: Vec<String> = (0..n).map(|i| nth(metavars, i).to_string()).collect();
            locale.join_metavars(&parts)
        }
        Some(Nargs::Optional) => locale.brackets(first),
        Some(Nargs::OneOrMore) => repeat(),
        Some(Nargs::ZeroOrMore) => match form {
            MetavarForm::Full => locale.brackets(&repeat()),
            MetavarForm::Short => locale.brackets(&locale.ellipsis(&format!("{first} "))),
        },
    }
}

fn nth(metavars: &[String], index: usize) -> &str {
    &metavars[index.min(metavars.len() - 1)]
}

/// Codes joined into one summary, each followed by the metavar.
///
/// With `compact` only the last code carries the metavar. Positional
/// arguments are summarized by their metavar alone.
pub(crate) fn format_codes(
    argument: &Argument,
    codes: &[&Code],
    metavar: &str,
    compact: bool,
    locale: &dyn Locale,
) -> String {
    if !argument.is_option {
        return metavar.to_string();
    }
    let last = codes.len().saturating_sub(1);
    let parts: Vec<String> = codes
        .iter()
        .enumerate()
        .map(|(index, code)| {
            if metavar.is_empty() || (compact && index != last) {
                code.content.clone()
            } else {
                format!("{} {metavar}", code.content)
            }
        })
        .collect();
    locale.join_codes(&parts)
}

/// The usage-line form of an argument: first code plus metavar, bracketed
/// when optional, with non-breaking spaces.
pub(crate) fn usage_item(argument: &Argument, locale: &dyn Locale) -> String {
    let metavar = metavar_string(argument, locale, MetavarForm::Short);
    let text = if argument.is_option {
        let code = &argument.codes[0];
        format_codes(argument, &[code], &metavar, false, locale)
    } else {
        metavar
    };
    // `*` and `?` positionals are bracketed by their metavar already.
    let self_bracketed = !argument.is_option
        && matches!(argument.nargs(), Some(Nargs::ZeroOrMore | Nargs::Optional));
    let text = if argument.is_required() || self_bracketed {
        text
    } else {
        locale.brackets(&text)
    };
    non_breaking(&text)
}

/// Measured summaries of one argument.
#[derive(Clone, Debug)]
pub(crate) struct ArgumentSummary<'a> {
    pub argument: &'a Argument,
    /// All codes in declaration order.
    pub full: String,
    pub full_width: usize,
    /// Short codes only, for the separate-columns layout.
    pub short: String,
    pub short_width: usize,
    /// Long codes (or the positional metavar), for the separate-columns layout.
    pub long: String,
    pub long_width: usize,
}

impl<'a> ArgumentSummary<'a> {
    pub fn new(argument: &'a Argument, locale: &dyn Locale, format: &ResolvedFormat) -> Self {
        let metavar = metavar_string(argument, locale, MetavarForm::Full);
        let all: Vec<&Code> = argument.codes.iter().collect();
        let short_codes: Vec<&Code> = argument.short_codes().collect();
        let long_codes: Vec<&Code> = argument.long_codes().collect();

        let full = format_codes(argument, &all, &metavar, format.compact_metavars, locale);
        let (short, long) = if argument.is_option {
            let short_metavar = if long_codes.is_empty() { metavar.as_str() } else { "" };
            (
                format_codes(argument, &short_codes, short_metavar, format.compact_metavars, locale),
                format_codes(argument, &long_codes, &metavar, format.compact_metavars, locale),
            )
        } else {
            (String::new(), full.clone())
        };

        let measure = |s: &str| format.width_mode.measure(s);
        Self {
            argument,
            full_width: measure(&full),
            short_width: measure(&short),
            long_width: measure(&long),
            full,
            short,
            long,
        }
    }

    /// Whether the argument has both short and long summaries.
    pub fn is_split(&self) -> bool {
        !self.short.is_empty() && !self.long.is_empty()
    }
}

/// Measured label of a subcommand.
#[derive(Clone, Debug)]
pub(crate) struct CommandSummary<'a> {
    pub command: &'a Command,
    pub width: usize,
}

impl<'a> CommandSummary<'a> {
    pub fn new(command: &'a Command, format: &ResolvedFormat) -> Self {
        Self {
            command,
            width: format.width_mode.measure(command.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::lang::English;
    use crate::options::{ArgumentOptions, CodePreference};
    use crate::tokenize::DashStyle;
    use crate::tree::{ArgumentId, CommandId, Declaration, Target};
    use crate::types::ArgType;

    fn declare(codes: &[&str], options: ArgumentOptions) -> (Declaration, ArgumentId) {
        let mut decl = Declaration::new(DashStyle::Double, CodePreference::Long, Rc::new(English));
        let id = decl
            .add_argument(Target::Command(CommandId::ROOT), codes, options)
            .unwrap();
        (decl, id)
    }

    fn metavar(codes: &[&str], options: ArgumentOptions, form: MetavarForm) -> String {
        let (decl, id) = declare(codes, options);
        metavar_string(&decl[id], &English, form)
    }

    #[test]
    fn metavar_by_arity() {
        let string = || ArgumentOptions::of(ArgType::String);
        assert_eq!(metavar(&["--foo"], string(), MetavarForm::Full), "FOO");
        assert_eq!(
            metavar(&["--foo"], string().nargs(Nargs::OneOrMore), MetavarForm::Full),
            "FOO [FOO ...]"
        );
        assert_eq!(
            metavar(&["--foo"], string().nargs(Nargs::ZeroOrMore), MetavarForm::Full),
            "[FOO [FOO ...]]"
        );
        assert_eq!(
            metavar(&["--foo"], string().nargs(Nargs::ZeroOrMore), MetavarForm::Short),
            "[FOO ...]"
        );
        assert_eq!(
            metavar(&["--foo"], string().nargs(Nargs::Optional), MetavarForm::Full),
            "[FOO]"
        );
        assert_eq!(
            metavar(&["--foo"], string().nargs(Nargs::Exact(3)), MetavarForm::Full),
            "FOO FOO FOO"
        );
    }

    #[test]
    fn metavars_are_used_positionally() {
        let options = ArgumentOptions::of(ArgType::Integer)
            .nargs(Nargs::Exact(3))
            .metavars(["X", "Y"]);
        assert_eq!(metavar(&["--point"], options, MetavarForm::Full), "X Y Y");
    }

    #[test]
    fn flags_have_no_metavar() {
        assert_eq!(metavar(&["-f"], ArgumentOptions::new(), MetavarForm::Full), "");
    }

    #[test]
    fn summaries_join_codes() {
        let (decl, id) = declare(&["-o", "--output"], ArgumentOptions::of(ArgType::String));
        let summary = ArgumentSummary::new(&decl[id], &English, &ResolvedFormat::default());
        assert_eq!(summary.full, "-o OUTPUT, --output OUTPUT");
        assert_eq!(summary.full_width, 26);
        assert_eq!(summary.short, "-o");
        assert_eq!(summary.long, "--output OUTPUT");
        assert!(summary.is_split());
    }

    #[test]
    fn compact_metavars_only_follow_last_code() {
        let (decl, id) = declare(&["-o", "--output"], ArgumentOptions::of(ArgType::String));
        let format = ResolvedFormat {
            compact_metavars: true,
            ..ResolvedFormat::default()
        };
        let summary = ArgumentSummary::new(&decl[id], &English, &format);
        assert_eq!(summary.full, "-o, --output OUTPUT");
    }

    #[test]
    fn positional_summary_is_the_metavar() {
        let (decl, id) = declare(&["file"], ArgumentOptions::new().nargs(Nargs::OneOrMore));
        let summary = ArgumentSummary::new(&decl[id], &English, &ResolvedFormat::default());
        assert_eq!(summary.full, "FILE [FILE ...]");
        assert_eq!(summary.long, summary.full);
        assert!(summary.short.is_empty());
    }

    #[test]
    fn usage_items_bracket_optional_arguments() {
        let (decl, id) = declare(&["-v", "--verbose"], ArgumentOptions::new());
        assert_eq!(usage_item(&decl[id], &English), "[-v]");

        let (decl, id) = declare(&["-o", "--out"], ArgumentOptions::of(ArgType::String));
        assert_eq!(usage_item(&decl[id], &English), "[-o\u{a0}OUT]");

        let (decl, id) = declare(&["file"], ArgumentOptions::new());
        assert_eq!(usage_item(&decl[id], &English), "FILE");

        let (decl, id) = declare(&["rest"], ArgumentOptions::new().nargs(Nargs::ZeroOrMore));
        assert_eq!(usage_item(&decl[id], &English), "[REST\u{a0}...]");
    }
}
