//! Human-readable renderings of sizes and timestamps shown by the browser client.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count by repeatedly dividing by 1024 until the value fits
/// the unit, rounding to two decimals without trailing zeros.
///
/// Values past the terabyte range stay in `TB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Same as [`format_file_size`] for the provider's string-encoded sizes.
/// Absent or invalid input renders as zero bytes.
pub fn format_size_field(size: Option<&str>) -> String {
    let bytes = size.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0);
    format_file_size(bytes)
}

/// `Jan 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
