//! Core audio and token types

/// Audio signal and channel layout
pub mod audio;
/// Recognized, reference and timed tokens
pub mod token;

pub use audio::{AudioSignal, Channels};
pub use token::{
    RecognizedToken, ReferenceToken, TimedReferenceToken, TimingSource, Word,
    INTERPOLATED_CONFIDENCE,
};
