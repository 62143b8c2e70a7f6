//! Terminal size detection.

/// Width of the controlling terminal, or `None` when there is none.
#[cfg(feature = "terminal")]
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

/// Width of the controlling terminal. Always `None` without the `terminal`
/// feature.
#[cfg(not(feature = "terminal"))]
pub fn terminal_width() -> Option<usize> {
    None
}
