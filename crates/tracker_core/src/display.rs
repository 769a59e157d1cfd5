//! Small formatting helpers shared by board renderers.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `1536` -> `"1.5 KB"`. Values are rounded to two decimals with trailing
/// zeros dropped; anything past gigabytes stays in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && exponent < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[exponent])
}

/// Age of a card as shown on the board: "today", "3 days ago", "2 months ago".
/// Months are counted as 30 days. Future timestamps read as "today".
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - created_at).num_days().max(0);
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        2..=29 => format!("{days} days ago"),
        _ => match days / 30 {
            1 => "1 month ago".to_string(),
            months => format!("{months} months ago"),
        },
    }
}
