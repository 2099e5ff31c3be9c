//! Progress reporting contract tests (no fixtures required).

use std::sync::{Arc, Mutex};

use retime::{PercentTracker, ProgressCallback};

struct Recording(Mutex<Vec<u8>>);

impl Recording {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Vec::new())))
    }

    fn values(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl ProgressCallback for Recording {
    fn on_progress(&self, percent: u8) {
        self.0.lock().unwrap().push(percent);
    }
}

#[test]
fn full_run_is_monotonic_and_terminates_at_100() {
    let recording = Recording::new();
    let mut tracker = PercentTracker::new(recording.clone(), 100);
    for _ in 0..100 {
        tracker.advance();
    }
    tracker.finish();

    let values = recording.values();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*values.last().unwrap(), 100);
    assert_eq!(values.iter().filter(|&&v| v == 100).count(), 1);
    // One report per frame plus the terminal report.
    assert_eq!(values.len(), 101);
}

#[test]
fn awkward_totals_still_terminate_at_exactly_100() {
    // Totals that do not divide evenly into the percent granularity.
    for total in [1u64, 3, 7, 33, 101, 997] {
        let recording = Recording::new();
        let mut tracker = PercentTracker::new(recording.clone(), total);
        for _ in 0..total {
            tracker.advance();
        }
        tracker.finish();

        let values = recording.values();
        assert_eq!(*values.last().unwrap(), 100, "total {total}");
        assert_eq!(
            values.iter().filter(|&&v| v == 100).count(),
            1,
            "total {total}"
        );
        assert!(values.iter().all(|&v| v <= 100));
    }
}

#[test]
fn zero_total_reports_100_once_without_dividing() {
    let recording = Recording::new();
    let mut tracker = PercentTracker::new(recording.clone(), 0);
    tracker.finish();
    assert_eq!(recording.values(), vec![100]);
}

#[test]
fn no_report_before_the_first_frame() {
    let recording = Recording::new();
    let mut tracker = PercentTracker::new(recording.clone(), 50);
    assert!(recording.values().is_empty());
    tracker.advance();
    assert_eq!(recording.values(), vec![2]);
}
