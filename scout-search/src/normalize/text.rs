//! Text cleanup and field extraction helpers shared by the mappers.

/// Collapse every whitespace run (including newlines) into a single space
/// and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, ending with an ellipsis when
/// anything was cut. Operates on characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut truncated: String = text.chars().take(max_chars - 1).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}

/// Collapse whitespace and truncate: the standard treatment for summaries.
pub fn summary(text: Option<&str>, max_chars: usize) -> String {
    truncate_chars(&collapse_whitespace(text.unwrap_or_default()), max_chars)
}

/// The trimmed value when present and not blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Owned variant of [`non_empty`].
pub fn non_empty_owned(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_owned)
}

/// A count used as a ranking metric: absent counts are `0`.
pub fn count_metric(value: Option<u64>) -> f64 {
    value.unwrap_or(0) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_joins_runs() {
        assert_eq!(collapse_whitespace("  Foo   Bar\n\tPaper "), "Foo Bar Paper");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn truncate_respects_char_limit() {
        let text = "a".repeat(600);
        let out = truncate_chars(&text, 240);
        assert_eq!(out.chars().count(), 240);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_handles_multibyte_characters() {
        let text = "日本語のテキスト".repeat(20);
        let out = truncate_chars(&text, 5);
        assert!(out.chars().count() <= 5);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_to_zero_is_empty() {
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn summary_handles_missing_text() {
        assert_eq!(summary(None, 100), "");
        assert_eq!(summary(Some(" a \n b "), 100), "a b");
    }

    #[test]
    fn non_empty_filters_blank_values() {
        assert_eq!(non_empty(Some("  x ")), Some("x"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn count_metric_defaults_to_zero() {
        assert!((count_metric(None) - 0.0).abs() < f64::EPSILON);
        assert!((count_metric(Some(42)) - 42.0).abs() < f64::EPSILON);
    }
}
