//! Column width computation.
//!
//! The argument column is as wide as the widest summary, clamped to
//! `[arg_col_minimum_width, arg_col_maximum_width]`. Summaries that do not
//! fit the clamped column switch to the overflow layout during tabulation.

use crate::options::ResolvedFormat;

use super::annotate::{ArgumentSummary, CommandSummary};

/// Resolved column widths for one help screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Columns {
    pub full: usize,
    /// `[prefix, gap, arguments]` of the usage line.
    pub usage: [usize; 3],
    /// Left edge of the description column.
    pub arg_col: usize,
    /// Shared: `[indent, summary]`. Separate: `[indent, short, separator, long]`.
    pub args: Vec<usize>,
    /// `[gap, description]`.
    pub desc: [usize; 2],
    /// `[gap, value indent, value line]`.
    pub desc_value: [usize; 3],
    pub separate: bool,
}

impl Columns {
    /// Width available to a summary before it overflows.
    pub fn summary_width(&self) -> usize {
        self.args.last().copied().unwrap_or(0)
    }

    /// Width of everything right of the indent, for overflowing rows.
    pub fn overflow_width(&self) -> usize {
        self.full.saturating_sub(self.args[0])
    }

    /// Whether an argument's summary needs the overflow layout.
    ///
    /// In the separate-columns layout the long summary is checked against
    /// the long column. See [`Columns::short_overflows`] for the short one.
    pub fn overflows(&self, summary: &ArgumentSummary<'_>) -> bool {
        if self.separate {
            self.short_overflows(summary) || summary.long_width > self.summary_width()
        } else {
            summary.full_width > self.summary_width()
        }
    }

    /// Whether a short summary is wider than the limited short column. Such
    /// arguments are laid out with their full summary on a row of its own.
    pub fn short_overflows(&self, summary: &ArgumentSummary<'_>) -> bool {
        self.separate && summary.short_width > self.args[1]
    }

    /// Whether a command label needs the overflow layout.
    pub fn command_overflows(&self, summary: &CommandSummary<'_>) -> bool {
        summary.width > self.arg_col.saturating_sub(self.args[0])
    }
}

/// Usage line columns for a prefix such as `usage: prog sub`.
///
/// When the prefix leaves less than the minimum argument column for the
/// arguments, the arguments wrap under the prefix instead.
pub(crate) fn usage_columns(prefix_width: usize, format: &ResolvedFormat) -> [usize; 3] {
    let gap = format.usage_col_gap;
    let rest = format.max_width.saturating_sub(prefix_width + gap);
    if rest < format.arg_col_minimum_width.max(1) {
        [format.max_width, 0, 0]
    } else {
        [prefix_width, gap, rest]
    }
}

pub(crate) fn compute(
    arguments: &[ArgumentSummary<'_>],
    commands: &[CommandSummary<'_>],
    prefix_width: usize,
    format: &ResolvedFormat,
) -> Columns {
    let indent = format.arg_start_indent;
    let widest_command = commands.iter().map(|c| c.width).max().unwrap_or(0);

    let (separate, short, separator, widest) = if format.arg_separate_cols {
        let has_short = arguments.iter().any(|a| a.short_width > 0);
        let separator = if has_short { SEPARATOR_WIDTH } else { 0 };
        // Short summaries wider than half the widest column go to the
        // overflow layout instead of widening the short column.
        let limit = short_column_limit(format, separator);
        let short = arguments
            .iter()
            .map(|a| a.short_width)
            .filter(|width| *width <= limit)
            .max()
            .unwrap_or(0);
        let long = arguments.iter().map(|a| a.long_width).max().unwrap_or(0);
        (true, short, separator, (short + separator + long).max(widest_command))
    } else {
        let full = arguments.iter().map(|a| a.full_width).max().unwrap_or(0);
        (false, 0, 0, full.max(widest_command))
    };

    let arg_col = (indent + widest).clamp(
        format.arg_col_minimum_width,
        format.arg_col_maximum_width.max(format.arg_col_minimum_width),
    );
    let summary = arg_col.saturating_sub(indent);
    let args = if separate {
        vec![indent, short, separator, summary.saturating_sub(short + separator)]
    } else {
        vec![indent, summary]
    };

    let gap = format.arg_desc_col_gap;
    let desc = format.max_width.saturating_sub(arg_col + gap);
    Columns {
        full: format.max_width,
        usage: usage_columns(prefix_width, format),
        arg_col,
        args,
        desc: [gap, desc],
        desc_value: [gap, format.arg_value_indent, desc.saturating_sub(format.arg_value_indent)],
        separate,
    }
}

/// Width of the `", "` between the short and long columns.
pub(crate) const SEPARATOR_WIDTH: usize = 2;

/// Widest short summary that keeps at least half of the maximum argument
/// column for the long summaries.
fn short_column_limit(format: &ResolvedFormat, separator: usize) -> usize {
    let maximum = format
        .arg_col_maximum_width
        .max(format.arg_col_minimum_width)
        .saturating_sub(format.arg_start_indent);
    (maximum / 2).saturating_sub(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_columns_split_prefix_and_arguments() {
        let format = ResolvedFormat::default();
        assert_eq!(usage_columns(11, &format), [11, 1, 68]);
    }

    #[test]
    fn usage_columns_fall_back_for_long_prefixes() {
        let format = ResolvedFormat::default();
        assert_eq!(usage_columns(70, &format), [80, 0, 0]);
    }

    #[test]
    fn empty_help_uses_minimum_column() {
        let columns = compute(&[], &[], 11, &ResolvedFormat::default());
        assert_eq!(columns.arg_col, 14);
        assert_eq!(columns.args, vec![2, 12]);
        assert_eq!(columns.desc, [2, 64]);
        assert_eq!(columns.desc_value, [2, 4, 60]);
    }
}
