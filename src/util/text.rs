use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended when text is cut.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// ```
/// use reelfeed::util::display_width;
///
/// assert_eq!(display_width("reel"), 4);
/// assert_eq!(display_width("视频"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates `s` so it occupies at most `max_width` columns.
///
/// Appends "..." when text is cut and there is room for it. Widths of three
/// columns or fewer get a plain cut with no ellipsis.
///
/// ```
/// use reelfeed::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("#travel", 10), "#travel");
/// assert_eq!(truncate_to_width("#longboarding", 8), "#long...");
/// assert_eq!(truncate_to_width("#fun", 2), "#f");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width > ELLIPSIS_WIDTH {
        max_width - ELLIPSIS_WIDTH
    } else {
        max_width
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    let mut out = s[..end].to_string();
    if max_width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Removes control characters from catalog text before it reaches the terminal.
///
/// Catalog ids and tags are rendered on a single line, so tabs and newlines
/// become spaces and every other control character (ESC included) is dropped.
/// An escape sequence therefore loses its ESC byte and renders as inert text.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }

    let cleaned = s
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    Cow::Owned(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("#dance", 6), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("#skateboarding", 10), "#skateb...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // 4 columns of budget, each CJK char is 2 wide
        assert_eq!(truncate_to_width("旅行视频推荐", 7), "旅行...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("reels", 0), "");
        assert_eq!(truncate_to_width("reels", 1), "r");
        assert_eq!(truncate_to_width("reels", 3), "ree");
    }

    #[test]
    fn test_truncate_never_exceeds_width() {
        for width in 0..20 {
            let out = truncate_to_width("#casino #slots #jackpot", width);
            assert!(display_width(&out) <= width, "width {} gave {:?}", width, out);
        }
    }

    #[test]
    fn test_strip_clean_is_borrowed() {
        assert!(matches!(strip_control_chars("#fun"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_escape_sequences() {
        assert_eq!(strip_control_chars("\x1b[31m#red"), "[31m#red");
        assert_eq!(strip_control_chars("a\tb\nc"), "a b c");
        assert_eq!(strip_control_chars("bell\x07"), "bell");
    }
}
