//! Width-aware text helpers for rendering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';
const MASK_CHAR: char = '•';

/// Truncates `text` to `max_width` columns, keeping the head.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let next_width = width + ch.width().unwrap_or(0);
        if next_width + 1 > max_width {
            break;
        }
        truncated.push(ch);
        width = next_width;
    }
    truncated.push(ELLIPSIS);
    truncated
}

/// Truncates `text` to `max_width` columns, keeping the tail.
///
/// Used for input fields so the cursor end of the value stays visible.
pub fn truncate_start_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }
    let mut tail = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let next_width = width + ch.width().unwrap_or(0);
        if next_width + 1 > max_width {
            break;
        }
        tail.push(ch);
        width = next_width;
    }
    std::iter::once(ELLIPSIS).chain(tail.into_iter().rev()).collect()
}

/// Replaces every character of a secret value with a bullet.
pub fn mask(text: &str) -> String {
    text.chars().map(|_| MASK_CHAR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_with_ellipsis("abc", 5), "abc");
        assert_eq!(truncate_start_with_ellipsis("abc", 3), "abc");
    }

    #[test]
    fn test_truncate_head_and_tail() {
        assert_eq!(truncate_with_ellipsis("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_start_with_ellipsis("abcdefgh", 5), "…efgh");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate_with_ellipsis("abcdef", 1), "…");
        assert_eq!(truncate_start_with_ellipsis("abcdef", 0), "…");
    }

    #[test]
    fn test_mask_counts_chars() {
        assert_eq!(mask("pässword"), "••••••••");
        assert_eq!(mask(""), "");
    }
}
