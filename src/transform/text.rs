//! Free-text cleanup helpers

/// Collapses every run of whitespace (including newlines) into one space
///
/// Leading and trailing whitespace is dropped. `None` yields an empty string.
pub fn clean_text(text: Option<&str>) -> String {
    match text {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text(Some("  NPE in\n\n  FileSystem\t\tclose()  ")),
            "NPE in FileSystem close()"
        );
    }

    #[test]
    fn test_clean_text_handles_crlf() {
        assert_eq!(clean_text(Some("a\r\nb")), "a b");
    }

    #[test]
    fn test_clean_text_none_and_blank() {
        assert_eq!(clean_text(None), "");
        assert_eq!(clean_text(Some(" \n\t ")), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let text = "日本語のテキスト";
        assert_eq!(truncate_chars(text, 3), "日本語");
    }
}
