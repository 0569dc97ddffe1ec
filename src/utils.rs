use chrono::{DateTime, ParseError, Utc};

/// Parse an RFC 3339 timestamp as the GitHub API emits them
/// (`2024-05-01T12:00:00Z`), normalized to UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(input.trim()).map(|t| t.with_timezone(&Utc))
}

/// "just now", "5m ago", "3h ago", "2d ago", "4w ago".
pub fn format_elapsed(seconds: i64) -> String {
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 7 * 86_400 => format!("{}d ago", s / 86_400),
        s => format!("{}w ago", s / (7 * 86_400)),
    }
}

/// First line of `text`, cut to at most `max_chars` characters with an ellipsis.
pub fn first_line_truncated(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix(input: &str) -> Option<i64> {
        parse_timestamp(input).ok().map(|t| t.timestamp())
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(unix("1970-01-01T00:00:00Z"), Some(0));
        assert_eq!(unix("2000-03-01T00:00:00Z"), Some(951_868_800));
        assert_eq!(unix("2024-05-01T12:30:15Z"), Some(1_714_566_615));
        assert_eq!(unix("2024-05-01T14:30:15+02:00"), Some(1_714_566_615));
        assert_eq!(unix(" 2024-05-01T12:30:15.250Z "), Some(1_714_566_615));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-13-01T00:00:00Z").is_err());
        assert!(parse_timestamp("2024-05-01T25:00:00Z").is_err());
    }

    #[test]
    fn test_parse_timestamp_rejects_impossible_dates() {
        assert!(parse_timestamp("2024-02-31T00:00:00Z").is_err());
        assert!(parse_timestamp("2023-04-31T12:00:00Z").is_err());
        assert!(parse_timestamp("2023-02-29T00:00:00Z").is_err());
        assert!(parse_timestamp("2024-05-01T12:00:00+99:99").is_err());
        assert_eq!(unix("2024-02-29T00:00:00Z"), Some(1_709_164_800));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(-5), "just now");
        assert_eq!(format_elapsed(59), "just now");
        assert_eq!(format_elapsed(300), "5m ago");
        assert_eq!(format_elapsed(3 * 3600 + 10), "3h ago");
        assert_eq!(format_elapsed(2 * 86_400), "2d ago");
        assert_eq!(format_elapsed(30 * 86_400), "4w ago");
    }

    #[test]
    fn test_first_line_truncated() {
        assert_eq!(first_line_truncated("Fix bug\n\nLong body", 50), "Fix bug");
        assert_eq!(first_line_truncated("abcdefghij", 5), "abcd…");
        assert_eq!(first_line_truncated("", 5), "");
    }
}
