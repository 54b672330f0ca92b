//! Plain-text shaping for terminal display.
//!
//! These helpers are measured in characters, not bytes, so multibyte
//! text never splits mid-character.

use regex::{NoExpand, Regex};

fn split_at_chars(text: &str, count: usize) -> (&str, &str) {
    match text.char_indices().nth(count) {
        Some((index, _)) => text.split_at(index),
        None => (text, ""),
    }
}

/// Truncates `data` to fit a column of `length` characters, marking the cut
/// with a trailing ellipsis. A `length` of zero disables trimming.
pub fn trim_text(data: &str, length: usize) -> String {
    if length > 0 && data.chars().count() > length {
        let (head, _) = split_at_chars(data, length - 1);
        format!("{}...", head)
    } else {
        data.to_string()
    }
}

/// Wraps `data` into lines of exactly `length` characters, space padded,
/// optionally bracketed by a fence string on both sides. Lines that wrap
/// continue on the next row; empty lines produce no row.
pub fn fitted_blocks(data: &str, length: usize, fence: Option<&str>) -> String {
    let eol = if cfg!(windows) { "\r\n" } else { "\n" };
    let data = if cfg!(windows) {
        data.to_string()
    } else {
        data.replace('\r', "")
    };

    let lfence = fence.map(|f| format!("{} ", f)).unwrap_or_default();
    let rfence = fence.map(|f| format!(" {}", f)).unwrap_or_default();

    let mut output = String::new();
    for line in data.split('\n') {
        let expanded = line.replace('\t', &" ".repeat(8));
        let mut rest = expanded.as_str();
        while !rest.is_empty() {
            let (chunk, tail) = split_at_chars(rest, length);
            output.push_str(&format!(
                "{}{:<width$}{}{}",
                lfence,
                chunk,
                rfence,
                eol,
                width = length
            ));
            rest = tail;
        }
    }

    output
}

/// Case-insensitive literal replacement.
pub fn ireplace(old: &str, new: &str, text: &str) -> String {
    let pattern = Regex::new(&format!("(?i){}", regex::escape(old))).unwrap();
    pattern.replace_all(text, NoExpand(new)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_text_short_input_untouched() {
        assert_eq!(trim_text("short", 45), "short");
        assert_eq!(trim_text("exact", 5), "exact");
    }

    #[test]
    fn test_trim_text_marks_the_cut() {
        assert_eq!(trim_text("abcdefgh", 5), "abcd...");
    }

    #[test]
    fn test_trim_text_zero_disables() {
        assert_eq!(trim_text("anything goes here", 0), "anything goes here");
    }

    #[test]
    fn test_trim_text_multibyte() {
        assert_eq!(trim_text("ééééé", 3), "éé...");
    }

    #[test]
    fn test_fitted_blocks_pads_and_fences() {
        assert_eq!(fitted_blocks("hi", 5, Some("|")), "| hi    |\n");
    }

    #[test]
    fn test_fitted_blocks_wraps_long_lines() {
        assert_eq!(
            fitted_blocks("abcdefgh", 5, Some("|")),
            "| abcde |\n| fgh   |\n"
        );
    }

    #[test]
    fn test_fitted_blocks_skips_empty_lines() {
        assert_eq!(
            fitted_blocks("one\n\ntwo", 5, None),
            "one  \ntwo  \n"
        );
    }

    #[test]
    fn test_fitted_blocks_expands_tabs() {
        assert_eq!(fitted_blocks("\tx", 10, None), "        x \n");
    }

    #[test]
    fn test_fitted_blocks_strips_carriage_returns() {
        assert_eq!(fitted_blocks("a\r\nb", 3, None), "a  \nb  \n");
    }

    #[test]
    fn test_ireplace_ignores_case() {
        assert_eq!(
            ireplace("order", ") order", "project = X ORDER by rank"),
            "project = X ) order by rank"
        );
    }

    #[test]
    fn test_ireplace_is_literal() {
        assert_eq!(ireplace("a.c", "x", "a.c abc"), "x abc");
    }
}
