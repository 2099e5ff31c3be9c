//! Progress reporting for conversions.
//!
//! The transform reports conversion progress as integer percentages through
//! a [`ProgressCallback`]. The sequence delivered to a callback over one
//! conversion is guaranteed to be monotonically non-decreasing, to stay
//! within `[0, 100]`, and to end with exactly one `100` — even when the
//! source reports zero total frames.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use retime::{ProgressCallback, RetimeError, SpeedFactor, SpeedTransform};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, percent: u8) {
//!         println!("Conversion: {percent}%");
//!     }
//! }
//!
//! let factor = SpeedFactor::new(2.0)?;
//! SpeedTransform::new(factor)
//!     .with_progress(Arc::new(PrintProgress))
//!     .run("input.mp4", "output.mp4")?;
//! # Ok::<(), RetimeError>(())
//! ```

use std::sync::Arc;

/// Trait for receiving progress updates during a conversion.
///
/// Implementations must be [`Send`] and [`Sync`] because the transform runs
/// on a background thread in the interactive shells.
///
/// Callbacks are **infallible** — they observe but cannot halt the
/// conversion.
pub trait ProgressCallback: Send + Sync {
    /// Called with the current completion percentage, at least once per
    /// processed source frame and exactly once with `100` at completion.
    fn on_progress(&self, percent: u8);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _percent: u8) {}
}

/// Tracks frames processed against the expected total and emits percentages.
///
/// In-flight reports are computed as `floor(processed / total * 100)` and
/// capped at 99 so the terminal `100` is emitted exactly once, by
/// [`finish`](PercentTracker::finish). When the total is zero (empty or
/// unknown-length sources) no per-frame reports are emitted at all; the
/// division is never attempted.
pub struct PercentTracker {
    callback: Arc<dyn ProgressCallback>,
    total_frames: u64,
    processed: u64,
    finished: bool,
}

impl PercentTracker {
    /// Create a tracker for a conversion expected to process `total_frames`.
    pub fn new(callback: Arc<dyn ProgressCallback>, total_frames: u64) -> Self {
        Self {
            callback,
            total_frames,
            processed: 0,
            finished: false,
        }
    }

    /// Record one processed source frame and report the new percentage.
    pub fn advance(&mut self) {
        self.processed += 1;
        if self.total_frames == 0 {
            return;
        }
        let percent = (self.processed * 100 / self.total_frames).min(99) as u8;
        self.callback.on_progress(percent);
    }

    /// Emit the terminal `100`. Idempotent: later calls are ignored.
    pub fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.callback.on_progress(100);
        }
    }

    /// Frames recorded so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recording(Mutex<Vec<u8>>);

    impl ProgressCallback for Recording {
        fn on_progress(&self, percent: u8) {
            self.0.lock().unwrap().push(percent);
        }
    }

    fn run_tracker(total: u64, frames: u64) -> Vec<u8> {
        let recording = Arc::new(Recording(Mutex::new(Vec::new())));
        let mut tracker = PercentTracker::new(recording.clone(), total);
        for _ in 0..frames {
            tracker.advance();
        }
        tracker.finish();
        let values = recording.0.lock().unwrap().clone();
        values
    }

    #[test]
    fn in_flight_reports_cap_at_99() {
        let values = run_tracker(10, 10);
        let (last, in_flight) = values.split_last().unwrap();
        assert_eq!(*last, 100);
        assert!(in_flight.iter().all(|&v| v <= 99));
    }

    #[test]
    fn zero_total_with_frames_never_divides() {
        // Metadata said zero frames but the stream produced some anyway:
        // no in-flight percentages, just the terminal report.
        assert_eq!(run_tracker(0, 5), vec![100]);
    }

    #[test]
    fn finish_is_idempotent() {
        let recording = Arc::new(Recording(Mutex::new(Vec::new())));
        let mut tracker = PercentTracker::new(recording.clone(), 10);
        tracker.finish();
        tracker.finish();
        assert_eq!(*recording.0.lock().unwrap(), vec![100]);
    }

    #[test]
    fn more_frames_than_total_stays_clamped() {
        let values = run_tracker(10, 25);
        assert!(values.iter().all(|&v| v <= 100));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.last(), Some(&100));
    }
}
