// Utility functions shared by the source adapters
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Html;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses the date formats job boards send; `None` if none fits.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Careerjet sends RFC 2822 dates ("Tue, 02 Apr 2024 09:30:00 GMT").
    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a unix timestamp in seconds.
pub fn from_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Reads a date that may come either as a string or as unix seconds.
pub fn parse_json_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_datetime(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(from_timestamp),
        _ => None,
    }
}

/// Reduces an HTML fragment to its visible text, whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    if !html.contains('<') {
        return collapse_whitespace(html);
    }
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn parses_board_date_formats() {
        let dt = parse_datetime("2024-03-05T10:20:30Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 3, 5, 10));

        assert!(parse_datetime("2024-03-05T10:20:30.123Z").is_some());
        assert!(parse_datetime("2024-03-05T10:20:30").is_some());
        assert!(parse_datetime("2024-03-05T10:20:30+02:00").is_some());
        assert_eq!(parse_datetime("2024-03-05").unwrap().day(), 5);
        let rfc2822 = parse_datetime("Tue, 02 Apr 2024 09:30:00 GMT").unwrap();
        assert_eq!((rfc2822.month(), rfc2822.day(), rfc2822.hour()), (4, 2, 9));
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn json_dates_accept_timestamps() {
        let dt = parse_json_date(&json!(1_700_000_000)).unwrap();
        assert_eq!(dt.year(), 2023);
        assert!(parse_json_date(&json!(null)).is_none());
        assert!(parse_json_date(&json!("2024-01-01")).is_some());
    }

    #[test]
    fn html_is_reduced_to_text() {
        let text = html_to_text("<p>We use <b>Rust</b>&amp;<i>Go</i></p>\n<ul><li>3 ans</li></ul>");
        assert!(text.contains("Rust"));
        assert!(text.contains("&"));
        assert!(text.contains("3 ans"));
        assert!(!text.contains('<'));
        assert_eq!(html_to_text("  plain   text "), "plain text");
    }
}
