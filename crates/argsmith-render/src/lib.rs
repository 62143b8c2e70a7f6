//! # argsmith-render - Text Layout for Help Screens
//!
//! The layout primitives behind `argsmith` help output: measuring text the
//! way a terminal displays it, wrapping it into fixed-width columns, and
//! merging rows of columns into a single block of text.
//!
//! ## Measuring
//!
//! [`WidthMode::Visual`] counts terminal columns (CJK ideographs take two,
//! ANSI escapes take none). [`WidthMode::Chars`] counts characters.
//!
//! ```rust
//! use argsmith_render::{display_width, WidthMode};
//!
//! assert_eq!(display_width("日本"), 4);
//! assert_eq!(WidthMode::Chars.measure("日本"), 2);
//! ```
//!
//! ## Wrapping
//!
//! [`wrap`] breaks text on spaces, between wide characters, and on explicit
//! newlines, then pads every line to the column width. Continuation lines
//! can be indented.
//!
//! ```rust
//! use argsmith_render::{wrap, WrapOptions};
//!
//! let lines = wrap("one two three", &WrapOptions::new(8).sub_indent(2));
//! assert_eq!(lines, vec!["one two ", "  three "]);
//! ```
//!
//! ## Merging
//!
//! A [`Table`] is a list of [`RowGroup`]s; each group is a list of [`Row`]s
//! and each row a list of [`Cell`]s with a fixed width. Rendering wraps each
//! cell, lays the cells side by side, separates rows with a newline and
//! groups with a blank line.
//!
//! ```rust
//! use argsmith_render::{Cell, Row, RowGroup, Table, WidthMode};
//!
//! let mut table = Table::new(WidthMode::Visual);
//! table.push(RowGroup::from(vec![Row::new(vec![
//!     Cell::new(2, ""),
//!     Cell::new(8, "--quiet"),
//!     Cell::new(20, "Print less."),
//! ])]));
//! assert_eq!(table.render(), "  --quiet Print less.");
//! ```

mod measure;
mod table;
mod wrap;

pub use measure::{display_width, non_breaking, pad_right, WidthMode, NBSP};
pub use table::{merge_row, Cell, Row, RowGroup, Table};
pub use wrap::{wrap, WrapOptions};
