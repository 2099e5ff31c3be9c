//! The speed transform — stream frames from a source to a destination,
//! dropping or retaining them per the speed factor.
//!
//! [`SpeedTransform`] opens the source, opens an MP4/MPEG-4 destination
//! encoder at `input_rate × factor`, and streams decoded frames through the
//! retention policy in [`SpeedFactor`]. No audio stream is produced even if
//! the source has one, and no hardware acceleration is used. All FFmpeg
//! contexts are released on both success and failure paths when they go out
//! of scope; a partially written destination is left in place on failure.
//!
//! # Example
//!
//! ```no_run
//! use retime::{RetimeError, SpeedFactor, SpeedTransform};
//!
//! let factor = SpeedFactor::new(2.0)?;
//! let report = SpeedTransform::new(factor).run("input.mp4", "output_2x.mp4")?;
//! println!(
//!     "kept {} of {} frames at {:.2} fps",
//!     report.frames_written, report.frames_read, report.output_rate,
//! );
//! # Ok::<(), RetimeError>(())
//! ```

use std::{path::Path, sync::Arc, time::Duration};

use ffmpeg_next::codec::Id;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::{Flags as FormatFlags, Pixel};
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::{Packet, Rational};

use crate::error::RetimeError;
use crate::progress::{NoOpProgress, PercentTracker, ProgressCallback};
use crate::source::stream_frame_rate;
use crate::speed::SpeedFactor;

/// Frame accounting for a completed conversion.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct TransformReport {
    /// Source frames decoded.
    pub frames_read: u64,
    /// Frames written to the destination.
    pub frames_written: u64,
    /// The destination frame rate (input rate × speed factor).
    pub output_rate: f64,
}

/// A configured speed-change conversion.
///
/// Create via [`SpeedTransform::new`], optionally attach a progress callback,
/// then call [`run`](SpeedTransform::run). The transform may be run from a
/// background thread; it owns its decoder and encoder state exclusively for
/// the duration of the call.
pub struct SpeedTransform {
    factor: SpeedFactor,
    callback: Arc<dyn ProgressCallback>,
}

impl SpeedTransform {
    /// Create a transform for the given (already validated) speed factor.
    pub fn new(factor: SpeedFactor) -> Self {
        Self {
            factor,
            callback: Arc::new(NoOpProgress),
        }
    }

    /// Attach a progress callback.
    ///
    /// The callback receives integer percentages per the contract on
    /// [`ProgressCallback::on_progress`].
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Run the conversion, writing the retimed video to `destination`.
    ///
    /// The destination is always an MP4 container with MPEG-4 Part 2 video
    /// at the source resolution, regardless of the path's extension.
    ///
    /// # Errors
    ///
    /// - [`RetimeError::SourceOpen`] / [`RetimeError::NoVideoStream`] if the
    ///   source cannot be opened or decoded.
    /// - [`RetimeError::DestinationOpen`] if the destination cannot be
    ///   created or its encoder opened.
    /// - [`RetimeError::DecodeError`] / [`RetimeError::EncodeError`] on
    ///   mid-stream failures.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        destination: Q,
    ) -> Result<TransformReport, RetimeError> {
        let source = source.as_ref();
        let destination = destination.as_ref();

        log::info!(
            "Retiming {} -> {} at {}",
            source.display(),
            destination.display(),
            self.factor,
        );

        ffmpeg_next::init().map_err(|error| RetimeError::SourceOpen {
            path: source.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        // ── Source side ────────────────────────────────────────────────

        let mut input =
            ffmpeg_next::format::input(&source).map_err(|error| RetimeError::SourceOpen {
                path: source.to_path_buf(),
                reason: error.to_string(),
            })?;

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let (stream_index, parameters, input_rate, total_frames) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or(RetimeError::NoVideoStream)?;

            let input_rate = stream_frame_rate(&stream);
            let declared_frames = stream.frames();
            let total_frames = if declared_frames > 0 {
                declared_frames as u64
            } else if input_rate > 0.0 {
                (duration.as_secs_f64() * input_rate) as u64
            } else {
                0
            };

            (stream.index(), stream.parameters(), input_rate, total_frames)
        };

        if input_rate <= 0.0 {
            return Err(RetimeError::SourceOpen {
                path: source.to_path_buf(),
                reason: "could not determine the input frame rate".to_string(),
            });
        }

        let mut decoder = CodecContext::from_parameters(parameters)
            .map_err(|error| RetimeError::SourceOpen {
                path: source.to_path_buf(),
                reason: format!("cannot create decoder: {error}"),
            })?
            .decoder()
            .video()
            .map_err(|error| RetimeError::SourceOpen {
                path: source.to_path_buf(),
                reason: format!("cannot open video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();
        let output_rate = self.factor.output_rate(input_rate);

        log::debug!(
            "Source: {}x{}, {:.2} fps, ~{} frames; output rate {:.2} fps, retention interval {}",
            width,
            height,
            input_rate,
            total_frames,
            output_rate,
            self.factor.retention_interval(),
        );

        // ── Destination side ───────────────────────────────────────────

        // The container is pinned to MP4 rather than inferred from the
        // extension; the codec is the original tool's `mp4v` fourcc.
        let mut output = ffmpeg_next::format::output_as(&destination, "mp4").map_err(|error| {
            RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: error.to_string(),
            }
        })?;

        // Check the global-header flag before adding the stream (avoids a
        // borrow conflict).
        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let encoder_codec =
            ffmpeg_next::encoder::find(Id::MPEG4).ok_or_else(|| RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: "MPEG-4 encoder not available".to_string(),
            })?;

        let mut stream = output.add_stream(encoder_codec).map_err(|error| {
            RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: format!("cannot add stream: {error}"),
            }
        })?;

        let output_stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: format!("cannot create codec context: {error}"),
            })?
            .encoder()
            .video()
            .map_err(|error| RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: format!("cannot open video encoder: {error}"),
            })?;

        // Output rates are frequently fractional (e.g. 30 fps × 0.25), so
        // the rate is carried as a millirate rational.
        let encoder_rate = rate_rational(output_rate);
        let encoder_time_base = Rational::new(encoder_rate.denominator(), encoder_rate.numerator());

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(Pixel::YUV420P);
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(encoder_rate));

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |= ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let mut encoder =
            encoder
                .open_as(encoder_codec)
                .map_err(|error| RetimeError::DestinationOpen {
                    path: destination.to_path_buf(),
                    reason: format!("cannot open encoder: {error}"),
                })?;

        stream.set_parameters(&encoder);

        output
            .write_header()
            .map_err(|error| RetimeError::DestinationOpen {
                path: destination.to_path_buf(),
                reason: format!("cannot write header: {error}"),
            })?;

        // The muxer may adjust the stream time base when the header is
        // written, so read it back afterwards.
        let stream_time_base = output
            .stream(output_stream_index)
            .map(|stream| stream.time_base())
            .unwrap_or(encoder_time_base);

        let mut tracker = PercentTracker::new(Arc::clone(&self.callback), total_frames);

        // A source that declares zero frames would poison the progress
        // division; finalize an empty output instead of streaming.
        if total_frames == 0 {
            log::warn!("Source declares zero frames; writing an empty output");
            output
                .write_trailer()
                .map_err(|error| RetimeError::EncodeError(format!("cannot write trailer: {error}")))?;
            tracker.finish();
            return Ok(TransformReport {
                frames_read: 0,
                frames_written: 0,
                output_rate,
            });
        }

        // ── Streaming loop ─────────────────────────────────────────────

        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::YUV420P,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| RetimeError::DecodeError(format!("cannot create scaler: {error}")))?;

        let mut decoded = VideoFrame::empty();
        let mut frames_read: u64 = 0;
        let mut frames_written: i64 = 0;

        for (stream, packet) in input.packets() {
            if stream.index() != stream_index {
                continue;
            }

            decoder
                .send_packet(&packet)
                .map_err(|error| RetimeError::DecodeError(format!("send_packet failed: {error}")))?;

            while decoder.receive_frame(&mut decoded).is_ok() {
                if self.factor.keeps_frame(frames_read) {
                    let mut yuv_frame = VideoFrame::empty();
                    scaler.run(&decoded, &mut yuv_frame).map_err(|error| {
                        RetimeError::EncodeError(format!("scaling failed: {error}"))
                    })?;
                    yuv_frame.set_pts(Some(frames_written));
                    frames_written += 1;

                    encoder.send_frame(&yuv_frame).map_err(|error| {
                        RetimeError::EncodeError(format!("send_frame failed: {error}"))
                    })?;

                    let mut packet = Packet::empty();
                    while encoder.receive_packet(&mut packet).is_ok() {
                        packet.set_stream(output_stream_index);
                        packet.rescale_ts(encoder_time_base, stream_time_base);
                        packet.write_interleaved(&mut output).map_err(|error| {
                            RetimeError::EncodeError(format!("write packet failed: {error}"))
                        })?;
                    }
                }

                frames_read += 1;
                tracker.advance();
            }
        }

        // Flush the decoder.
        decoder
            .send_eof()
            .map_err(|error| RetimeError::DecodeError(format!("send_eof failed: {error}")))?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            if self.factor.keeps_frame(frames_read) {
                let mut yuv_frame = VideoFrame::empty();
                scaler
                    .run(&decoded, &mut yuv_frame)
                    .map_err(|error| RetimeError::EncodeError(format!("scaling failed: {error}")))?;
                yuv_frame.set_pts(Some(frames_written));
                frames_written += 1;

                encoder.send_frame(&yuv_frame).map_err(|error| {
                    RetimeError::EncodeError(format!("send_frame failed: {error}"))
                })?;

                let mut packet = Packet::empty();
                while encoder.receive_packet(&mut packet).is_ok() {
                    packet.set_stream(output_stream_index);
                    packet.rescale_ts(encoder_time_base, stream_time_base);
                    packet.write_interleaved(&mut output).map_err(|error| {
                        RetimeError::EncodeError(format!("write packet failed: {error}"))
                    })?;
                }
            }

            frames_read += 1;
            tracker.advance();
        }

        // Flush the encoder.
        encoder
            .send_eof()
            .map_err(|error| RetimeError::EncodeError(format!("send_eof failed: {error}")))?;
        let mut packet = Packet::empty();
        while encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(output_stream_index);
            packet.rescale_ts(encoder_time_base, stream_time_base);
            packet.write_interleaved(&mut output).map_err(|error| {
                RetimeError::EncodeError(format!("write flush packet failed: {error}"))
            })?;
        }

        output
            .write_trailer()
            .map_err(|error| RetimeError::EncodeError(format!("cannot write trailer: {error}")))?;

        tracker.finish();

        log::info!(
            "Retimed {}: read {} frames, wrote {} at {:.2} fps",
            source.display(),
            frames_read,
            frames_written,
            output_rate,
        );

        Ok(TransformReport {
            frames_read,
            frames_written: frames_written as u64,
            output_rate,
        })
    }
}

/// A frame rate as a millirate rational (e.g. 7.5 fps → 7500/1000), which
/// represents every fractional rate the fixed speed menu can produce.
fn rate_rational(frames_per_second: f64) -> Rational {
    Rational::new((frames_per_second * 1000.0).round() as i32, 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rational_carries_fractions() {
        let rate = rate_rational(7.5);
        assert_eq!(rate.numerator(), 7500);
        assert_eq!(rate.denominator(), 1000);

        let rate = rate_rational(60.0);
        assert_eq!(rate.numerator(), 60000);
    }
}
