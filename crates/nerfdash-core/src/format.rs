//! Display formatting for sizes, durations and dates.

use chrono::{DateTime, Utc};

use crate::models::MetricKey;

/// Format a byte count with 1024-based units, two decimals.
pub fn format_file_size(size_bytes: f64) -> String {
    if size_bytes == 0.0 {
        return "0B".to_string();
    }
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", size, UNITS[unit])
}

/// Parse a legacy `"4.34 MB"`-style payload back to bytes. Unknown units
/// fall back to the bare numeric value.
pub fn parse_file_size(formatted: &str) -> f64 {
    let mut parts = formatted.split_whitespace();
    let value: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    match parts.next().map(|u| u.to_ascii_uppercase()) {
        Some(u) if u == "KB" => value * 1024.0,
        Some(u) if u == "MB" => value * 1024.0 * 1024.0,
        Some(u) if u == "GB" => value * 1024.0 * 1024.0 * 1024.0,
        _ => value,
    }
}

/// Format whole seconds as `41s`, `3m, 5s` or `2h, 10m, 3s`, skipping zero
/// components past the leading one.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 3600 {
        let minutes = seconds / 60;
        let rest = seconds % 60;
        return if rest > 0 {
            format!("{minutes}m, {rest}s")
        } else {
            format!("{minutes}m")
        };
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let rest = seconds % 60;
    let mut out = format!("{hours}h");
    if minutes > 0 {
        out.push_str(&format!(", {minutes}m"));
    }
    if rest > 0 {
        out.push_str(&format!(", {rest}s"));
    }
    out
}

/// Compact display form of a record timestamp.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%d %b %Y, %H:%M").to_string()
}

/// Metric display: byte sizes get units, frame counts round, everything
/// else gets two decimals. NaN renders as a dash, not a crash.
pub fn format_metric(metric: MetricKey, value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else if metric.is_byte_size() {
        format_file_size(value)
    } else if metric == MetricKey::FramesQuantity {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_units_scale_by_1024() {
        assert_eq!(format_file_size(0.0), "0B");
        assert_eq!(format_file_size(512.0), "512.00B");
        assert_eq!(format_file_size(4.34 * 1024.0 * 1024.0), "4.34MB");
        assert_eq!(format_file_size(10.5 * 1024.0 * 1024.0 * 1024.0), "10.50GB");
    }

    #[test]
    fn size_parse_inverts_format() {
        assert_eq!(parse_file_size("4.34 MB"), 4.34 * 1024.0 * 1024.0);
        assert_eq!(parse_file_size("100 KB"), 100.0 * 1024.0);
        // unit-less falls back to the raw number
        assert_eq!(parse_file_size("123"), 123.0);
        assert_eq!(parse_file_size(""), 0.0);
    }

    #[test]
    fn durations_skip_zero_components() {
        assert_eq!(format_duration(41), "41s");
        assert_eq!(format_duration(185), "3m, 5s");
        assert_eq!(format_duration(180), "3m");
        assert_eq!(format_duration(7803), "2h, 10m, 3s");
        assert_eq!(format_duration(7200), "2h");
    }
}
