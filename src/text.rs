// src/text.rs
// Terminal-width aware string helpers shared by the plain CLI table and the TUI.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cuts `s` to at most `max` terminal columns, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-aligns `s` in exactly `width` columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let fill = width.saturating_sub(display_width(&cut));
    format!("{}{}", cut, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(truncate_to_width("Goa", 10), "Goa");
    }

    #[test]
    fn long_strings_end_with_an_ellipsis() {
        assert_eq!(truncate_to_width("Red Fort, New Delhi", 8), "Red For…");
        assert_eq!(display_width(&truncate_to_width("Red Fort, New Delhi", 8)), 8);
    }

    #[test]
    fn wide_characters_count_double() {
        // Each CJK character occupies two columns.
        assert_eq!(truncate_to_width("東京都庁", 5), "東京…");
    }

    #[test]
    fn padding_fills_to_the_exact_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(display_width(&pad_to_width("हिंदी", 8)), 8);
    }
}
