//! Display helpers shared by cards and pages.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// `2026-05-02 14:00 UTC`
pub fn datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// `Sat 2 May, 14:00`
pub fn short_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%a %-d %b, %H:%M").to_string()
}

/// Value for an `<input type="datetime-local">`.
pub fn to_input(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

/// Parse an `<input type="datetime-local">` value, read as UTC.
pub fn from_input(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `year_round` -> `Year round`
pub fn label(text: &str) -> String {
    let spaced = text.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `None` for blank input, trimmed text otherwise.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_input_round_trip() {
        let dt = Utc.with_ymd_and_hms(2026, 5, 2, 14, 30, 0).unwrap();
        assert_eq!(to_input(&dt), "2026-05-02T14:30");
        assert_eq!(from_input("2026-05-02T14:30"), Some(dt));
        assert_eq!(from_input("tomorrow"), None);
    }

    #[test]
    fn labels_are_humanized() {
        assert_eq!(label("year_round"), "Year round");
        assert_eq!(label("field_trip"), "Field trip");
        assert_eq!(label(""), "");
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Mint "), Some("Mint".to_string()));
    }
}
