//! Duration rendering for report footers and log lines
//!
//! Scan durations span four orders of magnitude (a cached single-region
//! scan finishes in milliseconds, a 17-region account takes seconds), so
//! the rendering picks its unit per value: sub-millisecond durations
//! collapse to `"< 1ms"`, sub-second ones render as whole milliseconds
//! (`"456ms"`), everything else as fractional seconds (`"1.23s"`).

use std::time::Duration;

/// Render a duration with the unit that fits its magnitude
pub fn format_duration(duration: Duration) -> String {
    if duration >= Duration::from_secs(1) {
        return format!("{:.2}s", duration.as_secs_f64());
    }
    match duration.as_millis() {
        0 => "< 1ms".to_string(),
        ms => format!("{ms}ms"),
    }
}
