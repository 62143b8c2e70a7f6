//! Text measurement and padding.

use console::measure_text_width;
use unicode_width::UnicodeWidthChar;

/// No-break space. Text joined with it is never split by [`crate::wrap`]
/// and is rendered as a regular space.
pub const NBSP: char = '\u{a0}';

/// How the width of a piece of text is counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidthMode {
    /// Terminal columns: wide characters count as two, ANSI escapes as zero.
    #[default]
    Visual,
    /// One column per `char`.
    Chars,
}

impl WidthMode {
    /// Picks [`WidthMode::Visual`] when `visual` is set, [`WidthMode::Chars`]
    /// otherwise.
    pub fn from_visual(visual: bool) -> Self {
        if visual {
            WidthMode::Visual
        } else {
            WidthMode::Chars
        }
    }

    /// Width of a string under this mode.
    pub fn measure(self, s: &str) -> usize {
        match self {
            WidthMode::Visual => display_width(s),
            WidthMode::Chars => s.chars().count(),
        }
    }

    /// Width of a single character under this mode.
    pub fn char_width(self, c: char) -> usize {
        match self {
            WidthMode::Visual => c.width().unwrap_or(0),
            WidthMode::Chars => 1,
        }
    }
}

/// Returns the display width of a string, ignoring ANSI escape codes.
///
/// ```rust
/// use argsmith_render::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Pads a string on the right to reach `width`. Never truncates.
pub fn pad_right(s: &str, width: usize, mode: WidthMode) -> String {
    let current = mode.measure(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(current));
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(current)));
    out
}

/// Replaces every regular space with [`NBSP`] so the text wraps as one word.
pub fn non_breaking(s: &str) -> String {
    s.replace(' ', "\u{a0}")
}
