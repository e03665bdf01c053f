use std::io;
use thiserror::Error;

/// Result type for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Error types for lyrics synchronization and its audio boundary
#[derive(Error, Debug)]
pub enum SyncError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Caller-supplied input cannot be synchronized (empty audio, empty lyrics)
    #[error("Input error: {0}")]
    InputError(String),

    /// The recognition collaborator failed or timed out for one segment
    #[error("Recognition unavailable for segment {segment}: {reason}")]
    RecognitionUnavailable {
        /// Index of the segment that produced no result
        segment: usize,
        /// What went wrong
        reason: String,
    },

    /// Recognizer output could not be parsed
    #[error("Transcript error: {0}")]
    TranscriptError(String),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Resampling operation failed
    #[error("Resampling error: {0}")]
    ResamplingError(String),

    /// Invalid channel configuration
    #[error("Invalid channel configuration: expected {expected}, got {got}")]
    InvalidChannels {
        /// Expected number of channels
        expected: u32,
        /// Got number of channels
        got: u32,
    },

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Buffer-related error
    #[error("Buffer error: {0}")]
    BufferError(String),

    /// Segmentation operation failed
    #[error("Segmentation error: {0}")]
    SegmentationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        SyncError::InputError(message.into())
    }

    pub(crate) fn recognition(segment: usize, reason: impl std::fmt::Display) -> Self {
        SyncError::RecognitionUnavailable {
            segment,
            reason: reason.to_string(),
        }
    }
}

impl From<symphonia::core::errors::Error> for SyncError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        SyncError::DecodeError(err.to_string())
    }
}

impl From<hound::Error> for SyncError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => SyncError::Io(e),
            e => SyncError::EncodeError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::TranscriptError(err.to_string())
    }
}
