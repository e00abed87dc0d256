//! Unicode-aware text measurement, padding, and truncation.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Returns the display width of a string in terminal columns.
///
/// CJK and other wide characters count as 2 columns; zero-width
/// characters count as 0.
///
/// # Example
///
/// ```rust
/// use objfmt_grid::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Pads a string on the right with spaces to the given display width.
///
/// Strings already at or beyond `width` are returned unchanged.
pub fn pad_right(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + (width - current));
    out.push_str(s);
    for _ in current..width {
        out.push(' ');
    }
    out
}

/// Truncates a string to fit within `max_width` display columns, appending
/// `marker` when truncation occurs.
///
/// # Example
///
/// ```rust
/// use objfmt_grid::truncate_end;
///
/// assert_eq!(truncate_end("Hello World", 8, "…"), "Hello W…");
/// assert_eq!(truncate_end("Hello", 8, "…"), "Hello");
/// ```
pub fn truncate_end(s: &str, max_width: usize, marker: &str) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let marker_width = display_width(marker);
    let limit = max_width.saturating_sub(marker_width);

    let mut out = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > limit {
            break;
        }
        out.push(c);
        current += w;
    }
    out.push_str(marker);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("abc"), 3);
    }

    #[test]
    fn display_width_wide_chars() {
        assert_eq!(display_width("日本語"), 6);
        assert_eq!(display_width("a日b"), 4);
    }

    #[test]
    fn pad_right_short_string() {
        assert_eq!(pad_right("ab", 5), "ab   ");
    }

    #[test]
    fn pad_right_exact_and_long() {
        assert_eq!(pad_right("abcde", 5), "abcde");
        assert_eq!(pad_right("abcdef", 5), "abcdef");
    }

    #[test]
    fn pad_right_counts_display_columns() {
        // 日 is 2 columns wide, so only 2 spaces are needed
        assert_eq!(pad_right("日", 4), "日  ");
    }

    #[test]
    fn truncate_end_fits() {
        assert_eq!(truncate_end("short", 10, "…"), "short");
    }

    #[test]
    fn truncate_end_cuts_and_marks() {
        assert_eq!(truncate_end("Hello World", 8, "…"), "Hello W…");
        assert_eq!(truncate_end("Hello World", 8, "..."), "Hello...");
    }

    #[test]
    fn truncate_end_wide_chars() {
        // Each CJK char is 2 columns; 5 columns leave room for 2 chars + marker
        assert_eq!(truncate_end("日本語", 5, "…"), "日本…");
    }
}
