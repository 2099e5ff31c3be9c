//! Error types for the `retime` crate.
//!
//! This module defines [`RetimeError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context (paths,
//! upstream messages) to diagnose a failure without extra logging at the call
//! site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `retime` operations.
///
/// Every public method that can fail returns `Result<T, RetimeError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RetimeError {
    /// The speed factor is zero, negative, or not a finite number.
    ///
    /// This is a user input error: it is raised by
    /// [`SpeedFactor::new`](crate::SpeedFactor::new) before any file I/O
    /// takes place, so no partial output is ever created for it.
    #[error("Speed factor must be a positive number (got {0})")]
    InvalidSpeedFactor(f64),

    /// The source file could not be opened or decoded.
    #[error("Failed to open source {path}: {reason}")]
    SourceOpen {
        /// Path that was passed to the transform or probe.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The source file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The destination file could not be created or its encoder opened.
    #[error("Failed to create destination {path}: {reason}")]
    DestinationOpen {
        /// Path the transform attempted to write.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A source frame could not be decoded mid-stream.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// A frame could not be encoded or written mid-stream.
    ///
    /// Any partially written destination file is left in place.
    #[error("Failed to encode video frame: {0}")]
    EncodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl From<FfmpegError> for RetimeError {
    fn from(error: FfmpegError) -> Self {
        RetimeError::FfmpegError(error.to_string())
    }
}
