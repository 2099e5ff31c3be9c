//! Advisory duration/size estimation tests (no fixtures required).

use retime::estimate::{
    ADVISORY_BITRATE_MBPS, duration_label, duration_seconds, estimated_size_mb, format_duration,
};

#[test]
fn duration_formats_as_hh_mm_ss() {
    assert_eq!(format_duration(0.0), "00:00:00");
    assert_eq!(format_duration(5.0), "00:00:05");
    assert_eq!(format_duration(65.0), "00:01:05");
    assert_eq!(format_duration(3600.0), "01:00:00");
    assert_eq!(format_duration(7325.0), "02:02:05");
}

#[test]
fn unavailable_metadata_reports_unknown() {
    assert_eq!(duration_label(0, 0.0), "Unknown");
    assert_eq!(duration_label(0, 30.0), "Unknown");
    assert_eq!(duration_label(300, 0.0), "Unknown");
    assert_eq!(duration_label(300, -30.0), "Unknown");
}

#[test]
fn known_metadata_reports_numeric_duration() {
    // 100 frames at 30 fps is 3.33 s, truncated to whole seconds.
    assert_eq!(duration_label(100, 30.0), "00:00:03");
    assert_eq!(duration_label(1800, 30.0), "00:01:00");
}

#[test]
fn duration_seconds_matches_frames_over_rate() {
    assert_eq!(duration_seconds(300, 30.0), Some(10.0));
    assert_eq!(duration_seconds(0, 30.0), None);
    assert_eq!(duration_seconds(300, 0.0), None);
}

#[test]
fn size_estimate_uses_bitrate_over_eight() {
    // 2.5 Mb/s for 80 s = 200 Mb = 25 MB.
    assert_eq!(estimated_size_mb(80.0, ADVISORY_BITRATE_MBPS), 25.0);
    // Rounded to two decimals.
    assert_eq!(estimated_size_mb(10.0, ADVISORY_BITRATE_MBPS), 3.13);
}
