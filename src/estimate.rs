//! Advisory duration and file-size estimates.
//!
//! These figures are shown next to a selected file in the shells. They are
//! guidance only: the size estimate assumes a fixed nominal bitrate and is
//! not tied to what the encoder actually achieves, so callers must label it
//! as an estimate.

/// Nominal bitrate (megabits per second) used for size estimates.
pub const ADVISORY_BITRATE_MBPS: f64 = 2.5;

/// Format a duration in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as u64;
    let (hours, rest) = (total / 3600, total % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Duration of a video as a display string.
///
/// Returns `"Unknown"` rather than a numeric value when the frame count or
/// frame rate is unavailable or non-positive.
pub fn duration_label(total_frames: u64, frame_rate: f64) -> String {
    match duration_seconds(total_frames, frame_rate) {
        Some(seconds) => format_duration(seconds),
        None => "Unknown".to_string(),
    }
}

/// Duration in seconds, or `None` when it cannot be computed.
pub fn duration_seconds(total_frames: u64, frame_rate: f64) -> Option<f64> {
    if total_frames > 0 && frame_rate > 0.0 {
        Some(total_frames as f64 / frame_rate)
    } else {
        None
    }
}

/// Estimated output size in megabytes at the given nominal bitrate, rounded
/// to two decimals.
pub fn estimated_size_mb(duration_seconds: f64, bitrate_mbps: f64) -> f64 {
    (bitrate_mbps * duration_seconds / 8.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(61.0), "00:01:01");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(86400.0), "24:00:00");
    }

    #[test]
    fn unknown_when_inputs_are_non_positive() {
        assert_eq!(duration_label(0, 30.0), "Unknown");
        assert_eq!(duration_label(100, 0.0), "Unknown");
        assert_eq!(duration_label(100, -1.0), "Unknown");
        assert_eq!(duration_label(90, 30.0), "00:00:03");
    }

    #[test]
    fn size_estimate_rounds_to_two_decimals() {
        // 2.5 Mb/s over 100 s = 250 Mb = 31.25 MB.
        assert_eq!(estimated_size_mb(100.0, ADVISORY_BITRATE_MBPS), 31.25);
        assert_eq!(estimated_size_mb(1.0, ADVISORY_BITRATE_MBPS), 0.31);
        assert_eq!(estimated_size_mb(0.0, ADVISORY_BITRATE_MBPS), 0.0);
    }
}
