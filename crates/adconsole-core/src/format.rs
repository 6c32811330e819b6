//! Display formatting shared by the pages.

use chrono::{DateTime, Utc};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Human-readable file size: `512 B`, `2.00 KB`, `5.00 MB`. Missing or zero
/// sizes render as `N/A`.
pub fn format_file_size(bytes: Option<u64>) -> String {
    match bytes {
        None | Some(0) => "N/A".to_string(),
        Some(b) if b < KIB => format!("{} B", b),
        Some(b) if b < MIB => format!("{:.2} KB", b as f64 / KIB as f64),
        Some(b) => format!("{:.2} MB", b as f64 / MIB as f64),
    }
}

pub fn format_date(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_datetime(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Truncate to `max_len` characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
