//! Utility functions for the macro_forecast crate

/// Split a time-ordered series into training and test segments.
///
/// The training segment holds the first `floor(train_ratio * len)`
/// observations and the test segment the remainder.
pub fn train_test_split(data: &[f64], train_ratio: f64) -> (Vec<f64>, Vec<f64>) {
    if data.is_empty() || train_ratio <= 0.0 || train_ratio >= 1.0 {
        return (data.to_vec(), Vec::new());
    }

    let train_size = (data.len() as f64 * train_ratio).floor() as usize;

    let train = data[..train_size].to_vec();
    let test = data[train_size..].to_vec();

    (train, test)
}

/// Date parsing for the `Date` column
pub mod date_parser {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

    /// Parse a date or date-time cell; month-only values map to the first day
    pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_utc());
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt);
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        // "2023-01" style monthly periods
        NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}
