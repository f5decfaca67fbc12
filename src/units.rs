//! Byte-size conversion for report values.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format bytes to a human readable string such as `"1.50 KB"`.
///
/// The unit is the largest one for which the scaled value stays below 1024.
/// Values beyond that range are still reported in TB.
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}

/// Round a percentage to one decimal place.
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
