//! Date helper functions

use crate::content::parse_date_string;
use std::fmt::Write;

/// Format a post date string using a Moment.js-compatible format.
/// Dates that do not parse are shown as written.
///
/// # Examples
/// ```ignore
/// display_date("2024-01-15", "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn display_date(raw: &str, format: &str) -> String {
    let Some(date) = parse_date_string(raw) else {
        return raw.trim().to_string();
    };
    // chrono reports unknown specifiers as a fmt::Error
    let mut out = String::new();
    match write!(out, "{}", date.format(&moment_to_chrono_format(format))) {
        Ok(()) => out,
        Err(_) => {
            tracing::warn!("Invalid date format {:?}", format);
            raw.trim().to_string()
        }
    }
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
