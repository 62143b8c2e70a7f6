//! Rows of fixed-width cells merged into one block of text.

use crate::measure::WidthMode;
use crate::wrap::{wrap, WrapOptions};

/// One column of a row: a width and the text to wrap into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub width: usize,
    pub content: String,
    /// Indentation of continuation lines when the content wraps.
    pub sub_indent: usize,
}

impl Cell {
    pub fn new(width: usize, content: impl Into<String>) -> Self {
        Self {
            width,
            content: content.into(),
            sub_indent: 0,
        }
    }

    /// An empty cell used as horizontal spacing.
    pub fn spacer(width: usize) -> Self {
        Self::new(width, "")
    }

    pub fn sub_indent(mut self, sub_indent: usize) -> Self {
        self.sub_indent = sub_indent;
        self
    }
}

/// Cells laid out left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Sum of the cell widths.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|cell| cell.width).sum()
    }
}

/// Rows rendered without blank lines between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowGroup {
    pub rows: Vec<Row>,
}

impl RowGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for RowGroup {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

/// Row groups rendered with blank lines between consecutive groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    groups: Vec<RowGroup>,
    mode: WidthMode,
    margin: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(WidthMode::default())
    }
}

impl Table {
    /// A table with one blank line between groups.
    pub fn new(mode: WidthMode) -> Self {
        Self {
            groups: Vec::new(),
            mode,
            margin: 1,
        }
    }

    /// Number of blank lines between groups.
    pub fn margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Appends a group. Empty groups are kept but produce no output.
    pub fn push(&mut self, group: RowGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[RowGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(RowGroup::is_empty)
    }

    /// Merges every group into the final text. Trailing spaces are trimmed
    /// from each line.
    pub fn render(&self) -> String {
        let separator = "\n".repeat(self.margin + 1);
        self.groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                group
                    .rows
                    .iter()
                    .flat_map(|row| merge_row(row, self.mode))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

/// Wraps each cell of a row and interleaves them into output lines.
///
/// The row is as tall as its tallest cell; shorter cells are filled with
/// spaces. Zero-width cells contribute nothing.
pub fn merge_row(row: &Row, mode: WidthMode) -> Vec<String> {
    let columns: Vec<Vec<String>> = row
        .cells
        .iter()
        .map(|cell| {
            let options = WrapOptions::new(cell.width)
                .sub_indent(cell.sub_indent)
                .mode(mode);
            wrap(&cell.content, &options)
        })
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..height)
        .map(|index| {
            let mut line = String::new();
            for (cell, lines) in row.cells.iter().zip(&columns) {
                match lines.get(index) {
                    Some(text) => line.push_str(text),
                    None => line.push_str(&" ".repeat(cell.width)),
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}
