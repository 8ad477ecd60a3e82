//! Pure formatting helpers shared by the CLI and library callers.
//!
//! Class-attribute helpers operate on space-separated class strings (the
//! admin console renders these into `class` attributes); the rest are small
//! display formatters with no state.

use chrono::{Local, LocalResult, TimeZone};
use regex::Regex;

use crate::dict::DictOption;

// ---------------------------------------------------------------------------
// Class-attribute helpers
// ---------------------------------------------------------------------------

/// Whether a space-separated class attribute contains `cls` as a whole word.
pub fn has_class(class_attr: &str, cls: &str) -> bool {
    class_word_regex(cls).is_match(class_attr)
}

/// Append `cls` to a class attribute unless already present.
pub fn add_class(class_attr: &str, cls: &str) -> String {
    if has_class(class_attr, cls) {
        class_attr.to_string()
    } else if class_attr.is_empty() {
        cls.to_string()
    } else {
        format!("{class_attr} {cls}")
    }
}

/// Remove `cls` from a class attribute; other classes keep their order.
pub fn remove_class(class_attr: &str, cls: &str) -> String {
    if !has_class(class_attr, cls) {
        return class_attr.to_string();
    }
    let replaced = class_word_regex(cls).replace_all(class_attr, " ");
    replaced.trim().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word matcher: `(\s|^)cls(\s|$)`.
fn class_word_regex(cls: &str) -> Regex {
    Regex::new(&format!(r"(\s|^){}(\s|$)", regex::escape(cls))).expect("escaped class pattern")
}

// ---------------------------------------------------------------------------
// Link and number formatting
// ---------------------------------------------------------------------------

/// Whether a path points outside the app (`http:`, `https:`, `mailto:`,
/// `tel:` schemes).
pub fn is_external(path: &str) -> bool {
    path.starts_with("http:")
        || path.starts_with("https:")
        || path.starts_with("mailto:")
        || path.starts_with("tel:")
}

/// Format a growth-rate fraction as an absolute percentage.
///
/// Zero renders as `"-"`. Otherwise the rate is scaled by 100, rounded to
/// two decimals, and trailing zeros (and a bare decimal point) are stripped:
/// `0.1234` → `"12.34%"`, `0.5` → `"50%"`, `-0.76` → `"76%"`.
pub fn format_growth_rate(rate: f64) -> String {
    if rate == 0.0 {
        return "-".to_string();
    }
    let formatted = format!("{:.2}", (rate * 100.0).abs());
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

/// Format a Unix timestamp (seconds) as `YYYY-MM-DD HH:MM` local time.
/// Zero renders as an empty string.
pub fn format_date(timestamp: i64) -> String {
    if timestamp == 0 {
        return String::new();
    }
    match Local.timestamp_opt(timestamp, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format("%Y-%m-%d %H:%M").to_string()
        }
        LocalResult::None => String::new(),
    }
}

/// The display label for a dict value, or empty when unknown.
pub fn dict_label(options: &[DictOption], value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label.clone())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_class_matches_whole_words_only() {
        assert!(has_class("btn btn-primary", "btn"));
        assert!(has_class("btn btn-primary", "btn-primary"));
        assert!(!has_class("btn-primary", "btn"));
        assert!(!has_class("", "btn"));
    }

    #[test]
    fn add_class_is_idempotent() {
        assert_eq!(add_class("btn", "active"), "btn active");
        assert_eq!(add_class("btn active", "active"), "btn active");
        assert_eq!(add_class("", "active"), "active");
    }

    #[test]
    fn remove_class_preserves_others() {
        assert_eq!(remove_class("btn active disabled", "active"), "btn disabled");
        assert_eq!(remove_class("active", "active"), "");
        assert_eq!(remove_class("btn", "active"), "btn");
    }

    #[test]
    fn external_links_detected_by_scheme() {
        assert!(is_external("https://x.com"));
        assert!(is_external("http://example.org/path"));
        assert!(is_external("mailto:admin@example.org"));
        assert!(is_external("tel:+15551234"));
        assert!(!is_external("/local/path"));
        assert!(!is_external("dashboard"));
    }

    #[test]
    fn growth_rate_zero_is_dash() {
        assert_eq!(format_growth_rate(0.0), "-");
    }

    #[test]
    fn growth_rate_two_decimals_trailing_zeros_stripped() {
        assert_eq!(format_growth_rate(0.1234), "12.34%");
        assert_eq!(format_growth_rate(0.5), "50%");
        assert_eq!(format_growth_rate(0.105), "10.5%");
    }

    #[test]
    fn growth_rate_takes_absolute_value() {
        assert_eq!(format_growth_rate(-0.76), "76%");
    }

    #[test]
    fn format_date_zero_is_empty() {
        assert_eq!(format_date(0), "");
    }

    #[test]
    fn format_date_shape() {
        let formatted = format_date(1_700_000_000);
        // Exact value depends on the local timezone; check the shape.
        let shape = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap();
        assert!(shape.is_match(&formatted), "got {formatted:?}");
    }

    #[test]
    fn dict_label_lookup() {
        let options = vec![
            DictOption {
                label: "Enabled".to_string(),
                value: "1".to_string(),
            },
            DictOption {
                label: "Disabled".to_string(),
                value: "0".to_string(),
            },
        ];
        assert_eq!(dict_label(&options, "1"), "Enabled");
        assert_eq!(dict_label(&options, "2"), "");
        assert_eq!(dict_label(&options, ""), "");
    }
}
