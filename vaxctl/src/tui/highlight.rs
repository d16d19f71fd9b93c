//! Regex match highlighting over OCR text.
//!
//! Matches are wrapped in a pair of private-use marker characters that the
//! viewer turns into styled spans. A pattern written with `\n` escapes is
//! split into one named group per line so each matched line is re-emitted on
//! its own line, keeping the layout of multi-line OCR text intact.

use regex::Regex;
use thiserror::Error;

/// Opens a highlighted run.
pub const MATCH_START: char = '\u{E000}';
/// Closes a highlighted run.
pub const MATCH_END: char = '\u{E001}';

const LINE_BREAK: &str = r"\n";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct HighlightError(#[from] regex::Error);

/// Mark every match of `pattern` in `text`.
///
/// Pure: the same inputs always yield the same output, and text outside the
/// matches is passed through untouched.
///
/// The per-line split is textual. A `\n` inside a character class or right
/// after an escaped backslash is split as well: `[^\n]` turns into a
/// different class and `\\n` no longer compiles.
pub fn highlight(pattern: &str, ignore_case: bool, text: &str) -> Result<String, HighlightError> {
    let breaks = pattern.matches(LINE_BREAK).count();
    let mut source = if breaks > 0 {
        pattern
            .split(LINE_BREAK)
            .enumerate()
            .map(|(i, segment)| format!("(?P<line{i}>{segment})"))
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    } else {
        pattern.to_string()
    };
    if ignore_case {
        source = format!("(?i){source}");
    }
    let re = Regex::new(&source)?;

    let replacement = if breaks > 0 {
        (0..=breaks)
            .map(|i| format!("{MATCH_START}${{line{i}}}{MATCH_END}"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{MATCH_START}${{0}}{MATCH_END}")
    };
    Ok(re.replace_all(text, replacement.as_str()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_markers(text: &str) -> String {
        text.chars()
            .filter(|c| *c != MATCH_START && *c != MATCH_END)
            .collect()
    }

    fn marked(s: &str) -> String {
        format!("{MATCH_START}{s}{MATCH_END}")
    }

    #[test]
    fn whole_match_is_wrapped() {
        let out = highlight("ERROR.*", true, "boot ok\nerror: disk full").unwrap();
        assert_eq!(out, format!("boot ok\n{}", marked("error: disk full")));
    }

    #[test]
    fn case_sensitive_when_asked() {
        let out = highlight("ERROR", false, "error ERROR").unwrap();
        assert_eq!(out, format!("error {}", marked("ERROR")));
    }

    #[test]
    fn multiline_pattern_keeps_line_breaks() {
        let out = highlight(r"foo\nbar", false, "foo\nbar").unwrap();
        assert_eq!(out, format!("{}\n{}", marked("foo"), marked("bar")));
        assert_eq!(out.matches('\n').count(), 1);
    }

    #[test]
    fn multiline_groups_are_not_shifted_by_inner_groups() {
        let out = highlight(r"(a)(b)\nc", false, "ab\nc").unwrap();
        assert_eq!(out, format!("{}\n{}", marked("ab"), marked("c")));
    }

    #[test]
    fn line_break_split_ignores_regex_syntax() {
        let out = highlight(r"ERROR[^\n]*", false, "ERROR: disk full").unwrap();
        assert_ne!(out, marked("ERROR: disk full"));
        assert!(out.contains('\n'), "{out:?}");

        let err = highlight(r"C:\\new", false, r"C:\new").unwrap_err();
        assert!(err.to_string().contains("unclosed group"), "{err}");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = highlight("ERROR(", true, "ERROR: disk full").unwrap_err();
        assert!(err.to_string().contains("unclosed group"), "{err}");
    }

    #[test]
    fn same_inputs_same_output() {
        let text = "ERROR: disk full";
        let first = highlight("disk", true, text).unwrap();
        let second = highlight("disk", true, text).unwrap();
        assert_eq!(first, second);
        assert_eq!(strip_markers(&first), text);
    }

    #[test]
    fn no_match_passes_text_through() {
        assert_eq!(highlight("xyz", true, "abc").unwrap(), "abc");
    }
}
