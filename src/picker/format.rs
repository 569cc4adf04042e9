//! Human-readable byte sizes for the selection summary.

/// Base-1024 unit labels, smallest first
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const K: u64 = 1024;

/// Format a byte count using the largest unit whose value is at least 1.
///
/// `0` is special-cased to `"0 Bytes"`. Whole bytes are shown without a decimal,
/// every larger unit is rounded to one decimal place (`1536` -> `"1.5 KB"`).
/// Sizes of 1024 GB and above stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // Integer equivalent of floor(log(bytes) / log(1024)), clamped to the unit table
    let mut index = 0;
    let mut scaled = bytes;
    while scaled >= K && index < UNITS.len() - 1 {
        scaled /= K;
        index += 1;
    }

    if index == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let value = bytes as f64 / (K as f64).powi(index as i32);
    format!("{:.1} {}", value, UNITS[index])
}
