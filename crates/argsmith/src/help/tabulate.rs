//! Turns annotated items into table rows.

use argsmith_render::{Cell, Row, RowGroup};

use crate::lang::Locale;
use crate::tree::{AcceptedValue, Section, SectionItem};

use super::annotate::{ArgumentSummary, CommandSummary};
use super::columns::Columns;

/// A single cell spanning the full width.
pub(crate) fn full_row(columns: &Columns, text: &str) -> Row {
    Row::new(vec![Cell::new(columns.full, text)])
}

/// Text indented like the argument summaries.
fn indented_row(columns: &Columns, text: &str) -> Row {
    Row::new(vec![
        Cell::spacer(columns.args[0]),
        Cell::new(columns.overflow_width(), text),
    ])
}

/// A description starting at the description column.
fn description_row(columns: &Columns, text: &str) -> Row {
    Row::new(vec![
        Cell::spacer(columns.arg_col),
        Cell::spacer(columns.desc[0]),
        Cell::new(columns.desc[1], text),
    ])
}

pub(crate) fn usage_row(columns: &Columns, prefix: &str, items: &str) -> Row {
    let [prefix_width, gap, rest] = columns.usage;
    if rest == 0 {
        let line = if items.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix} {items}")
        };
        return Row::new(vec![Cell::new(prefix_width, line)]);
    }
    Row::new(vec![
        Cell::new(prefix_width, prefix),
        Cell::spacer(gap),
        Cell::new(rest, items),
    ])
}

fn argument_rows(columns: &Columns, summary: &ArgumentSummary<'_>) -> Vec<Row> {
    let description = summary.argument.description();
    let overflow = columns.overflows(summary);

    let mut cells = vec![Cell::spacer(columns.args[0])];
    if columns.short_overflows(summary) {
        cells.push(Cell::new(columns.overflow_width(), summary.full.as_str()));
    } else if columns.separate {
        let separator = if summary.is_split() { ", " } else { "" };
        cells.push(Cell::new(columns.args[1], summary.short.as_str()));
        cells.push(Cell::new(columns.args[2], separator));
        let long_width = if overflow {
            columns.full.saturating_sub(columns.args[..3].iter().sum::<usize>())
        } else {
            columns.args[3]
        };
        cells.push(Cell::new(long_width, summary.long.as_str()));
    } else if overflow {
        cells.push(Cell::new(columns.overflow_width(), summary.full.as_str()));
    } else {
        cells.push(Cell::new(columns.args[1], summary.full.as_str()));
    }

    if overflow {
        let mut rows = vec![Row::new(cells)];
        if !description.is_empty() {
            rows.push(description_row(columns, description));
        }
        rows
    } else {
        cells.push(Cell::spacer(columns.desc[0]));
        cells.push(Cell::new(columns.desc[1], description));
        vec![Row::new(cells)]
    }
}

fn value_row(columns: &Columns, value: &AcceptedValue, locale: &dyn Locale, indent: usize) -> Row {
    let line = locale.value_line(&value.content, value.description.as_deref().unwrap_or(""));
    Row::new(vec![
        Cell::spacer(columns.arg_col),
        Cell::spacer(columns.desc_value[0]),
        Cell::spacer(columns.desc_value[1]),
        Cell::new(columns.desc_value[2], line).sub_indent(indent),
    ])
}

fn command_rows(columns: &Columns, summary: &CommandSummary<'_>) -> Vec<Row> {
    let label = summary.command.label();
    let description = summary.command.description.as_deref().unwrap_or("");
    if columns.command_overflows(summary) {
        let mut rows = vec![indented_row(columns, label)];
        if !description.is_empty() {
            rows.push(description_row(columns, description));
        }
        return rows;
    }
    vec![Row::new(vec![
        Cell::spacer(columns.args[0]),
        Cell::new(columns.arg_col.saturating_sub(columns.args[0]), label),
        Cell::spacer(columns.desc[0]),
        Cell::new(columns.desc[1], description),
    ])]
}

/// Everything needed to lay out the items of one section.
pub(crate) struct SectionLayout<'s, 'a> {
    pub columns: &'s Columns,
    pub arguments: &'s [ArgumentSummary<'a>],
    pub commands: &'s [CommandSummary<'a>],
    pub locale: &'s dyn Locale,
    pub value_desc_indent: usize,
}

impl SectionLayout<'_, '_> {
    /// The header row followed by one or more rows per item. Empty sections
    /// produce an empty group.
    pub fn rows(&self, section: &Section) -> RowGroup {
        let mut group = RowGroup::new();
        if section.items.is_empty() {
            return group;
        }
        group.push(full_row(self.columns, &section.title));
        if let Some(description) = &section.description {
            group.push(indented_row(self.columns, description));
        }
        for item in &section.items {
            match item {
                SectionItem::Argument(id) => {
                    let Some(summary) = self.arguments.iter().find(|s| s.argument.id == *id) else {
                        continue;
                    };
                    for row in argument_rows(self.columns, summary) {
                        group.push(row);
                    }
                    for value in &summary.argument.values {
                        group.push(value_row(
                            self.columns,
                            value,
                            self.locale,
                            self.value_desc_indent,
                        ));
                    }
                }
                SectionItem::Command(id) => {
                    let Some(summary) = self.commands.iter().find(|s| s.command.id == *id) else {
                        continue;
                    };
                    for row in command_rows(self.columns, summary) {
                        group.push(row);
                    }
                }
                SectionItem::Text(paragraphs) => {
                    for paragraph in paragraphs {
                        group.push(indented_row(self.columns, paragraph));
                    }
                }
            }
        }
        group
    }
}
