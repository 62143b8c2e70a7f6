//! Word wrapping into fixed-width columns.
//!
//! Text is broken on regular spaces and between wide (CJK) characters. Runs
//! joined with [`NBSP`](crate::NBSP) stay together unless they are wider than
//! the column, in which case they are split at character boundaries like any
//! other overlong word. Explicit newlines always start a new line.

use crate::measure::{pad_right, WidthMode, NBSP};

/// Options for [`wrap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapOptions {
    /// Column width. Every produced line is padded to it.
    pub width: usize,
    /// Indentation of continuation lines inside a paragraph.
    pub sub_indent: usize,
    /// How text is measured.
    pub mode: WidthMode,
}

impl WrapOptions {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            sub_indent: 0,
            mode: WidthMode::Visual,
        }
    }

    pub fn sub_indent(mut self, sub_indent: usize) -> Self {
        self.sub_indent = sub_indent;
        self
    }

    pub fn mode(mut self, mode: WidthMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A breakable unit of a paragraph.
#[derive(Debug)]
struct Piece {
    /// Spaces preceding the piece in the source text.
    gap: usize,
    text: String,
    width: usize,
}

/// Wraps `text` into lines of exactly `options.width` columns.
///
/// A zero width yields no lines. An empty paragraph yields one blank line.
/// Lines are only wider than the column when a single character is.
pub fn wrap(text: &str, options: &WrapOptions) -> Vec<String> {
    if options.width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, options, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, options: &WrapOptions, lines: &mut Vec<String>) {
    let mut builder = LineBuilder::new(options);
    for piece in split_pieces(paragraph, options.mode) {
        builder.push(piece, lines);
    }
    builder.finish(lines);
}

fn split_pieces(paragraph: &str, mode: WidthMode) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut gap = 0;
    let mut current = String::new();
    let mut current_width = 0;

    for c in paragraph.chars() {
        if c == ' ' {
            if !current.is_empty() {
                pieces.push(Piece {
                    gap,
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                gap = 0;
                current_width = 0;
            }
            gap += 1;
            continue;
        }
        let width = mode.char_width(c);
        if mode == WidthMode::Visual && width >= 2 {
            if !current.is_empty() {
                pieces.push(Piece {
                    gap,
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                gap = 0;
                current_width = 0;
            }
            pieces.push(Piece {
                gap,
                text: c.to_string(),
                width,
            });
            gap = 0;
            continue;
        }
        current.push(c);
        current_width += width;
    }
    if !current.is_empty() {
        pieces.push(Piece {
            gap,
            text: current,
            width: current_width,
        });
    }
    pieces
}

struct LineBuilder<'a> {
    options: &'a WrapOptions,
    line: String,
    width: usize,
    continuation: bool,
}

impl<'a> LineBuilder<'a> {
    fn new(options: &'a WrapOptions) -> Self {
        Self {
            options,
            line: String::new(),
            width: 0,
            continuation: false,
        }
    }

    fn indent(&self) -> usize {
        if self.continuation && self.options.sub_indent < self.options.width {
            self.options.sub_indent
        } else {
            0
        }
    }

    fn capacity(&self) -> usize {
        self.options.width - self.indent()
    }

    fn push(&mut self, mut piece: Piece, lines: &mut Vec<String>) {
        loop {
            // Leading spaces only survive on the first line of a paragraph.
            let gap = if self.line.is_empty() && self.continuation {
                0
            } else {
                piece.gap
            };
            if self.width + gap + piece.width <= self.capacity() {
                self.append(gap, &piece.text, piece.width);
                return;
            }
            if !self.line.is_empty() {
                self.flush(lines);
                continue;
            }
            let capacity = self.capacity();
            let (gap, available) = if capacity > gap {
                (gap, capacity - gap)
            } else {
                (0, capacity)
            };
            let (head, head_width, rest, rest_width) =
                split_at_width(&piece.text, available, self.options.mode);
            self.append(gap, &head, head_width);
            self.flush(lines);
            if rest.is_empty() {
                return;
            }
            piece = Piece {
                gap: 0,
                text: rest,
                width: rest_width,
            };
        }
    }

    fn append(&mut self, gap: usize, text: &str, width: usize) {
        self.line.extend(std::iter::repeat(' ').take(gap));
        self.line.push_str(text);
        self.width += gap + width;
    }

    fn flush(&mut self, lines: &mut Vec<String>) {
        let mut out = " ".repeat(self.indent());
        out.push_str(&self.line.replace(NBSP, " "));
        lines.push(pad_right(&out, self.options.width, self.options.mode));
        self.line.clear();
        self.width = 0;
        self.continuation = true;
    }

    fn finish(mut self, lines: &mut Vec<String>) {
        if !self.line.is_empty() || !self.continuation {
            self.flush(lines);
        }
    }
}

/// Splits `text` so the head fits `limit` columns. The head always holds at
/// least one character.
fn split_at_width(text: &str, limit: usize, mode: WidthMode) -> (String, usize, String, usize) {
    let mut head = String::new();
    let mut head_width = 0;
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        let width = mode.char_width(c);
        if !head.is_empty() && head_width + width > limit {
            break;
        }
        head.push(c);
        head_width += width;
        chars.next();
    }
    let rest: String = chars.collect();
    let rest_width = rest.chars().map(|c| mode.char_width(c)).sum();
    (head, head_width, rest, rest_width)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ascii_lines_match_column_width(
            text in "[a-z ]{0,80}",
            width in 1usize..40,
            sub_indent in 0usize..8,
        ) {
            let options = WrapOptions::new(width).sub_indent(sub_indent);
            for line in wrap(&text, &options) {
                prop_assert_eq!(line.chars().count(), width);
            }
        }

        #[test]
        fn wrapping_preserves_visible_characters(
            text in "[a-z日本 ]{0,60}",
            width in 2usize..30,
        ) {
            let lines = wrap(&text, &WrapOptions::new(width));
            let kept: String = lines.concat().chars().filter(|c| *c != ' ').collect();
            let original: String = text.chars().filter(|c| *c != ' ').collect();
            prop_assert_eq!(kept, original);
        }
    }
}
