//! Speed factor validation and the frame-retention policy.
//!
//! A [`SpeedFactor`] multiplies the output frame rate and decides which
//! decoded frames survive into the output:
//!
//! - factor ≥ 1.0 — *decimation*: frames are indexed from 0 and frame `i` is
//!   kept only when `i % interval == 0`, with `interval = round(factor)`
//!   clamped to at least 1. Frames are dropped, never merged, so a factor
//!   with a fractional part introduces temporal aliasing proportional to
//!   that fraction. This is a deliberate approximation, not a true resample.
//! - factor < 1.0 — every frame is kept and written at a lower output rate;
//!   the perceived slow motion comes entirely from the rate change, no
//!   frames are interpolated.

use crate::error::RetimeError;

/// The speed multipliers offered by the interactive shells.
///
/// Arbitrary positive factors are accepted by [`SpeedFactor::new`]; this
/// fixed menu is what the GUI combo box presents.
pub const SPEED_CHOICES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 2.0, 3.0, 5.0, 10.0];

/// A validated playback-speed multiplier.
///
/// Construction rejects non-positive and non-finite values, so a
/// `SpeedFactor` held anywhere in the program is always usable without
/// further checks.
///
/// # Example
///
/// ```
/// use retime::SpeedFactor;
///
/// let factor = SpeedFactor::new(2.0).unwrap();
/// assert_eq!(factor.retention_interval(), 2);
/// assert!(factor.keeps_frame(0));
/// assert!(!factor.keeps_frame(1));
///
/// assert!(SpeedFactor::new(0.0).is_err());
/// assert!(SpeedFactor::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    /// Validate and wrap a speed multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`RetimeError::InvalidSpeedFactor`] if `value` is zero,
    /// negative, NaN, or infinite.
    pub fn new(value: f64) -> Result<Self, RetimeError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(RetimeError::InvalidSpeedFactor(value))
        }
    }

    /// The raw multiplier.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether this factor speeds playback up (≥ 1.0) and therefore drops
    /// frames.
    pub fn is_speed_up(self) -> bool {
        self.0 >= 1.0
    }

    /// The decimation interval: keep one frame out of every `interval`.
    ///
    /// The factor is rounded to the nearest integer before the modulus is
    /// taken, and the result is clamped to a minimum of 1 so a factor below
    /// 0.5 can never produce a modulus-by-zero.
    pub fn retention_interval(self) -> u64 {
        (self.0.round() as u64).max(1)
    }

    /// Whether the decoded frame at `index` (counted from 0) is written to
    /// the output.
    pub fn keeps_frame(self, index: u64) -> bool {
        if self.is_speed_up() {
            index % self.retention_interval() == 0
        } else {
            true
        }
    }

    /// Predicted number of output frames for a source with `total_frames`.
    ///
    /// For factor ≥ 1.0 this is `ceil(total / interval)` (frame 0 is always
    /// kept); for factor < 1.0 every frame survives.
    pub fn retained_frames(self, total_frames: u64) -> u64 {
        if self.is_speed_up() {
            total_frames.div_ceil(self.retention_interval())
        } else {
            total_frames
        }
    }

    /// The output frame rate for a given input rate.
    pub fn output_rate(self, input_rate: f64) -> f64 {
        input_rate * self.0
    }
}

impl std::fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite() {
        assert!(SpeedFactor::new(0.0).is_err());
        assert!(SpeedFactor::new(-2.0).is_err());
        assert!(SpeedFactor::new(f64::NAN).is_err());
        assert!(SpeedFactor::new(f64::INFINITY).is_err());
        assert!(SpeedFactor::new(0.25).is_ok());
    }

    #[test]
    fn interval_rounds_and_clamps() {
        assert_eq!(SpeedFactor::new(2.0).unwrap().retention_interval(), 2);
        assert_eq!(SpeedFactor::new(2.5).unwrap().retention_interval(), 3);
        assert_eq!(SpeedFactor::new(1.0).unwrap().retention_interval(), 1);
        // 0.25 rounds to 0; the clamp keeps the modulus legal.
        assert_eq!(SpeedFactor::new(0.25).unwrap().retention_interval(), 1);
    }

    #[test]
    fn output_rate_scales_input_rate() {
        let factor = SpeedFactor::new(0.5).unwrap();
        assert_eq!(factor.output_rate(30.0), 15.0);
        let factor = SpeedFactor::new(2.0).unwrap();
        assert_eq!(factor.output_rate(30.0), 60.0);
    }
}
