//! End-to-end transform tests.
//!
//! Decode/encode tests require `tests/fixtures/sample_video.mp4` and skip
//! gracefully when it is absent; error-path tests run everywhere.

use std::path::Path;
use std::sync::{Arc, Mutex};

use retime::{ProgressCallback, RetimeError, SourceInfo, SpeedFactor, SpeedTransform};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

/// The MPEG-4 encoder is in every common FFmpeg build, but skip rather
/// than fail on exotic ones.
fn encoder_unavailable(error: &RetimeError) -> bool {
    let message = format!("{error}");
    message.contains("cannot open encoder") || message.contains("encoder not available")
}

struct Recording(Mutex<Vec<u8>>);

impl ProgressCallback for Recording {
    fn on_progress(&self, percent: u8) {
        self.0.lock().unwrap().push(percent);
    }
}

#[test]
fn missing_source_is_a_source_open_error() {
    let factor = SpeedFactor::new(2.0).unwrap();
    let temp = tempfile::tempdir().unwrap();
    let destination = temp.path().join("out.mp4");

    let result = SpeedTransform::new(factor).run("tests/fixtures/does_not_exist.mp4", &destination);

    match result {
        Err(RetimeError::SourceOpen { path, .. }) => {
            assert!(path.ends_with("does_not_exist.mp4"));
        }
        other => panic!("expected SourceOpen, got {other:?}"),
    }
    // No partial output for an open failure on the read side.
    assert!(!destination.exists());
}

#[test]
fn invalid_factor_is_rejected_before_any_io() {
    // Factor validation happens at construction, before a transform can
    // even be built, so no file is ever touched.
    assert!(matches!(
        SpeedFactor::new(0.0),
        Err(RetimeError::InvalidSpeedFactor(_))
    ));
    assert!(matches!(
        SpeedFactor::new(-3.0),
        Err(RetimeError::InvalidSpeedFactor(_))
    ));
}

#[test]
fn speed_up_halves_the_frame_count() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = SourceInfo::probe(path).expect("probe fixture");
    let temp = tempfile::tempdir().unwrap();
    let destination = temp.path().join("double_speed.mp4");

    let recording = Arc::new(Recording(Mutex::new(Vec::new())));
    let factor = SpeedFactor::new(2.0).unwrap();
    let result = SpeedTransform::new(factor)
        .with_progress(recording.clone())
        .run(path, &destination);

    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: MPEG-4 encoder not available ({error})");
            return;
        }
    }
    let report = result.expect("transform");

    // Decimation at interval 2: within one frame of half the input.
    let expected = report.frames_read as f64 / 2.0;
    assert!(
        (report.frames_written as f64 - expected).abs() <= 1.0,
        "wrote {} of {} frames",
        report.frames_written,
        report.frames_read,
    );
    assert!((report.output_rate - source.frame_rate * 2.0).abs() < 1e-6);

    assert!(destination.exists());
    assert!(std::fs::metadata(&destination).unwrap().len() > 0);

    // Progress: monotonic, ends with exactly one 100.
    let values = recording.0.lock().unwrap().clone();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(values.last(), Some(&100));
    assert_eq!(values.iter().filter(|&&v| v == 100).count(), 1);
}

#[test]
fn slow_down_keeps_every_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = SourceInfo::probe(path).expect("probe fixture");
    let temp = tempfile::tempdir().unwrap();
    let destination = temp.path().join("half_speed.mp4");

    let factor = SpeedFactor::new(0.5).unwrap();
    let result = SpeedTransform::new(factor).run(path, &destination);

    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: MPEG-4 encoder not available ({error})");
            return;
        }
    }
    let report = result.expect("transform");

    assert_eq!(report.frames_written, report.frames_read);
    assert!((report.output_rate - source.frame_rate * 0.5).abs() < 1e-6);
    assert!(destination.exists());
}

#[test]
fn unwritable_destination_is_a_destination_open_error() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let factor = SpeedFactor::new(2.0).unwrap();
    let destination = Path::new("tests/fixtures/no/such/directory/out.mp4");
    let result = SpeedTransform::new(factor).run(path, destination);

    match result {
        Err(RetimeError::DestinationOpen { .. }) => {}
        other => panic!("expected DestinationOpen, got {other:?}"),
    }
}

#[test]
fn probe_reports_stream_geometry() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = SourceInfo::probe(path).expect("probe fixture");
    assert!(source.width > 0);
    assert!(source.height > 0);
    assert!(source.frame_rate > 0.0);
    assert!(source.total_frames > 0);
}

#[test]
fn default_output_path_encodes_the_factor() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = SourceInfo::probe(path).expect("probe fixture");
    let factor = SpeedFactor::new(2.0).unwrap();
    let output = source.default_output_path(factor);
    assert_eq!(output.file_name().unwrap(), "sample_video_x2.mp4");
    assert_eq!(output.parent(), source.path.parent());
}
