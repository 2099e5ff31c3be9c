//! # retime
//!
//! Change the playback speed of a video file by dropping or retaining
//! frames and re-muxing them into a new file, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! Speeding up is frame *decimation*: for a factor `f ≥ 1.0`, frame `i` is
//! kept only when `i % round(f) == 0` and the output rate becomes
//! `input_rate × f`. Slowing down keeps every frame and simply lowers the
//! output rate. Frames are never merged or interpolated; the decimation is a
//! deliberate approximation whose aliasing grows with the factor's
//! fractional part.
//!
//! ## Quick Start
//!
//! ```no_run
//! use retime::{RetimeError, SpeedFactor, SpeedTransform};
//!
//! let factor = SpeedFactor::new(2.0)?;
//! let report = SpeedTransform::new(factor).run("input.mp4", "output_2x.mp4")?;
//! println!("wrote {} frames at {:.2} fps", report.frames_written, report.output_rate);
//! # Ok::<(), RetimeError>(())
//! ```
//!
//! ### Probe a file first
//!
//! ```no_run
//! use retime::{RetimeError, SourceInfo, estimate};
//!
//! let source = SourceInfo::probe("input.mp4")?;
//! println!(
//!     "Duration: {}",
//!     estimate::duration_label(source.total_frames, source.frame_rate),
//! );
//! # Ok::<(), RetimeError>(())
//! ```
//!
//! ## Shells
//!
//! Two front ends drive the same transform:
//!
//! - `retime` — an `eframe`/`egui` desktop window (feature `gui`, on by
//!   default) with drag-and-drop file selection, a fixed speed menu, a
//!   progress bar, and post-completion folder reveal.
//! - `retime-cli` — a `clap` command line with `probe` and `convert`
//!   subcommands and an `indicatif` progress bar.
//!
//! The output is always an MP4 container carrying MPEG-4 Part 2 video at
//! the source resolution. Audio is not carried over, variable frame rate
//! sources are treated as constant-rate, and a started conversion runs to
//! completion or failure — there is no cancellation.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod error;
pub mod estimate;
pub mod ffmpeg;
pub mod progress;
pub mod reveal;
pub mod source;
pub mod speed;
pub mod transform;

#[cfg(feature = "gui")]
pub mod gui;

pub use error::RetimeError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use progress::{PercentTracker, ProgressCallback};
pub use reveal::reveal_containing_folder;
pub use source::SourceInfo;
pub use speed::{SPEED_CHOICES, SpeedFactor};
pub use transform::{SpeedTransform, TransformReport};

#[cfg(feature = "gui")]
pub use gui::RetimeApp;
