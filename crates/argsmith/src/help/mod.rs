//! Help, usage, version and error text.
//!
//! Rendering runs in four stages:
//!
//! 1. **annotate**: summarize and measure every argument and command
//! 2. **columns**: derive column widths from the measurements
//! 3. **tabulate**: turn items into rows of fixed-width cells
//! 4. **merge**: wrap and join the cells ([`argsmith_render::Table`])
//!
//! Rendering is a pure function of the declaration, the program info and
//! the resolved format: the same inputs always produce the same text.

mod annotate;
mod columns;
mod tabulate;

use argsmith_render::{RowGroup, Table};

use crate::error::{ParseError, ParseErrorKind};
use crate::lang::Locale;
use crate::nargs::Nargs;
use crate::options::ResolvedFormat;
use crate::tree::{CommandId, Declaration, SectionItem};

use annotate::{usage_item, ArgumentSummary, CommandSummary};
use columns::Columns;
use tabulate::{full_row, usage_row, SectionLayout};

const DEFAULT_VERSION: &str = "0.0.0";

/// Program-level text shown around the argument listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Program name used in usage and error lines.
    pub prog: String,
    pub version: Option<String>,
    /// First line of the help screen.
    pub title: Option<String>,
    /// Paragraphs between the usage line and the argument listing.
    pub help: Vec<String>,
    /// Paragraphs after the argument listing.
    pub epilogue: Vec<String>,
}

/// Renders text for a declaration.
#[derive(Clone, Copy, Debug)]
pub struct HelpFormatter<'a> {
    decl: &'a Declaration,
    info: &'a ProgramInfo,
    format: &'a ResolvedFormat,
}

impl<'a> HelpFormatter<'a> {
    pub fn new(decl: &'a Declaration, info: &'a ProgramInfo, format: &'a ResolvedFormat) -> Self {
        Self { decl, info, format }
    }

    fn locale(&self) -> &'a dyn Locale {
        self.decl.locale()
    }

    fn table(&self) -> Table {
        Table::new(self.format.width_mode).margin(self.format.paragraph_margin)
    }

    fn usage_prefix(&self, command: CommandId) -> String {
        self.locale()
            .usage_prefix(&self.info.prog, &self.decl.command_path(command))
    }

    fn usage_items(&self, command: CommandId) -> String {
        let locale = self.locale();
        let arguments = self.decl.arguments_of(command);
        let items: Vec<String> = if self.format.compact_usage {
            let mut items = Vec::new();
            let mut positionals = Vec::new();
            for argument in arguments {
                if argument.is_option {
                    if items.is_empty() {
                        items.push(locale.usage_options().to_string());
                    }
                } else {
                    positionals.push(usage_item(argument, locale));
                }
            }
            items.extend(positionals);
            items
        } else {
            arguments.map(|argument| usage_item(argument, locale)).collect()
        };
        items.join(" ")
    }

    fn measure(&self, s: &str) -> usize {
        self.format.width_mode.measure(s)
    }

    fn annotate(&self, command: CommandId) -> Annotated<'a> {
        let decl: &'a Declaration = self.decl;
        let locale = self.locale();
        let arguments: Vec<ArgumentSummary<'a>> = decl
            .display_arguments(command)
            .into_iter()
            .map(|argument| ArgumentSummary::new(argument, locale, self.format))
            .collect();
        let commands: Vec<CommandSummary<'a>> = decl
            .sections_of(command)
            .into_iter()
            .flat_map(|section| section.items.iter())
            .filter_map(|item| match item {
                SectionItem::Command(id) => decl.command(*id),
                _ => None,
            })
            .map(|child| CommandSummary::new(child, self.format))
            .collect();
        let prefix = self.usage_prefix(command);
        let columns = columns::compute(&arguments, &commands, self.measure(&prefix), self.format);
        Annotated {
            command,
            prefix,
            arguments,
            commands,
            columns,
        }
    }

    fn usage_group(&self, annotated: &Annotated<'_>) -> RowGroup {
        let items = self.usage_items(annotated.command);
        RowGroup::from(vec![usage_row(&annotated.columns, &annotated.prefix, &items)])
    }

    fn paragraphs(&self, columns: &Columns, paragraphs: &[String], table: &mut Table) {
        for paragraph in paragraphs {
            table.push(RowGroup::from(vec![full_row(columns, paragraph)]));
        }
    }

    fn help_table(&self, annotated: &Annotated<'_>) -> Table {
        let columns = &annotated.columns;
        let mut table = self.table();

        if let Some(title) = &self.info.title {
            table.push(RowGroup::from(vec![full_row(columns, title)]));
        }
        table.push(self.usage_group(annotated));

        let command = &self.decl[annotated.command];
        if command.is_root() {
            self.paragraphs(columns, &self.info.help, &mut table);
        } else if let Some(description) = &command.description {
            table.push(RowGroup::from(vec![full_row(columns, description)]));
        }

        let layout = SectionLayout {
            columns,
            arguments: &annotated.arguments,
            commands: &annotated.commands,
            locale: self.locale(),
            value_desc_indent: self.format.arg_value_desc_indent,
        };
        for section in self.decl.sections_of(annotated.command) {
            table.push(layout.rows(section));
        }

        self.paragraphs(columns, &self.info.epilogue, &mut table);
        table
    }

    /// The full help screen of a command.
    pub fn help(&self, command: CommandId) -> String {
        self.help_table(&self.annotate(command)).render()
    }

    /// Just the usage line of a command.
    pub fn usage(&self, command: CommandId) -> String {
        let mut table = self.table();
        table.push(self.usage_group(&self.annotate(command)));
        table.render()
    }

    /// `prog version`, with `0.0.0` when no version is known.
    pub fn version(&self) -> String {
        let version = self.info.version.as_deref().unwrap_or(DEFAULT_VERSION);
        self.locale().version_line(&self.info.prog, version)
    }

    /// The localized reason of a parse error, without program name.
    pub fn error_reason(&self, err: &ParseError) -> String {
        let locale = self.locale();
        let token = err
            .token
            .as_ref()
            .map(|token| token.original.as_str())
            .unwrap_or("");
        let argument = err.argument.and_then(|id| self.decl.argument(id));
        let name = argument
            .map(|argument| argument.display_name())
            .unwrap_or_else(|| token.to_string());

        match err.kind {
            ParseErrorKind::UnknownOption | ParseErrorKind::UnknownArgument => {
                locale.unrecognized_arguments(token)
            }
            ParseErrorKind::IncorrectNumberOfValues => {
                let nargs = argument.and_then(|a| {
                    if a.accepts_values() {
                        a.nargs()
                    } else {
                        Some(Nargs::Exact(0))
                    }
                });
                locale.expected_values(&name, nargs)
            }
            ParseErrorKind::InvalidValueType => {
                let type_name = argument.map(|a| a.arg_type().name()).unwrap_or("");
                locale.invalid_value_type(&name, type_name, &err.values)
            }
            ParseErrorKind::InvalidValueOpts => {
                locale.invalid_value_choice(&name, &err.accepted, &err.values)
            }
            ParseErrorKind::MissingArguments => {
                let names: Vec<String> = err
                    .missing
                    .iter()
                    .filter_map(|id| self.decl.argument(*id))
                    .map(|argument| argument.display_name())
                    .collect();
                locale.missing_arguments(&names)
            }
        }
    }

    /// Usage (or full help) of the failing command followed by the error
    /// line.
    pub fn error(&self, err: &ParseError) -> String {
        let line = self
            .locale()
            .error_line(&self.info.prog, &self.error_reason(err));
        let annotated = self.annotate(err.command);
        let error_row = full_row(&annotated.columns, &line);
        if self.format.use_abbreviated_error {
            let mut group = self.usage_group(&annotated);
            group.push(error_row);
            let mut table = self.table();
            table.push(group);
            table.render()
        } else {
            let mut table = self.help_table(&annotated);
            table.push(RowGroup::from(vec![error_row]));
            table.render()
        }
    }
}

/// Measurements of one command's help screen.
struct Annotated<'a> {
    command: CommandId,
    prefix: String,
    arguments: Vec<ArgumentSummary<'a>>,
    commands: Vec<CommandSummary<'a>>,
    columns: Columns,
}
