//! Source video probing.
//!
//! [`SourceInfo`] captures everything the shells need to know about an input
//! file before a conversion starts: dimensions, frame rate, frame count, and
//! duration. It is read once when the file is selected and is immutable
//! thereafter.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, media::Type};

use crate::error::RetimeError;
use crate::speed::SpeedFactor;

/// Metadata for a selected source video.
///
/// # Example
///
/// ```no_run
/// use retime::{RetimeError, SourceInfo};
///
/// let source = SourceInfo::probe("input.mp4")?;
/// println!(
///     "{}x{} @ {:.2} fps, ~{} frames",
///     source.width, source.height, source.frame_rate, source.total_frames,
/// );
/// # Ok::<(), RetimeError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct SourceInfo {
    /// Path the file was probed from.
    pub path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate
    /// content; VFR correctness is out of scope).
    pub frame_rate: f64,
    /// Total number of frames. Taken from the container when declared,
    /// otherwise estimated from duration and frame rate; zero when neither
    /// is available.
    pub total_frames: u64,
    /// Container-level duration.
    pub duration: Duration,
    /// Video codec name (e.g. `"h264"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}

impl SourceInfo {
    /// Open a video file and read its stream metadata.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, and locates the best
    /// video stream.
    ///
    /// # Errors
    ///
    /// - [`RetimeError::SourceOpen`] if the file cannot be opened.
    /// - [`RetimeError::NoVideoStream`] if it has no video stream.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self, RetimeError> {
        let path = path.as_ref();
        log::debug!("Probing source file: {}", path.display());

        ffmpeg_next::init().map_err(|error| RetimeError::SourceOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| RetimeError::SourceOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let format = input.format().name().to_string();

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or(RetimeError::NoVideoStream)?;

        let frame_rate = stream_frame_rate(&stream);

        let declared_frames = stream.frames();
        let total_frames = if declared_frames > 0 {
            declared_frames as u64
        } else if frame_rate > 0.0 {
            (duration.as_secs_f64() * frame_rate) as u64
        } else {
            0
        };

        let decoder = CodecContext::from_parameters(stream.parameters())?
            .decoder()
            .video()?;

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let info = Self {
            path: path.to_path_buf(),
            width: decoder.width(),
            height: decoder.height(),
            frame_rate,
            total_frames,
            duration,
            codec,
            format,
        };

        log::debug!(
            "Source: {}x{}, {:.2} fps, ~{} frames, codec={}, format={}",
            info.width, info.height, info.frame_rate, info.total_frames, info.codec, info.format,
        );

        Ok(info)
    }

    /// Default destination path for a conversion: `<stem>_x<factor>.mp4`
    /// next to the source.
    pub fn default_output_path(&self, factor: SpeedFactor) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let name = format!("{stem}_x{}.mp4", factor.get());
        match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Frames per second from the stream's average frame rate, falling back to
/// the declared real base rate when the average is undefined.
pub(crate) fn stream_frame_rate(stream: &ffmpeg_next::Stream) -> f64 {
    let average = stream.avg_frame_rate();
    if average.denominator() != 0 && average.numerator() != 0 {
        return average.numerator() as f64 / average.denominator() as f64;
    }
    let rate = stream.rate();
    if rate.denominator() != 0 {
        rate.numerator() as f64 / rate.denominator() as f64
    } else {
        0.0
    }
}
