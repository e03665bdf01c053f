#![warn(missing_docs)]

//! # lyricsync: Lyrics-to-Audio Synchronization
//!
//! Times every word of a known lyric against a recording, using a speech
//! recognizer only as a source of timestamps.
//!
//! ## Pipeline
//!
//! - **Segment** - Down-mix, resample and cut the audio into windows
//! - **Recognize** - Run a [`recognizer::Recognizer`] per window in parallel
//! - **Align** - Pair lyric words with recognized words by edit distance
//! - **Interpolate** - Time the lyric words nothing was heard for
//! - **Format** - Emit a word list and an LRC document
//!
//! ## Quick Start
//!
//! ```ignore
//! use lyricsync::{LyricsSync, SyncConfig};
//! use lyricsync::recognizer::TranscriptRecognizer;
//! use std::sync::Arc;
//!
//! let audio = lyricsync::decoder::decode_file("song.mp3")?;
//! let recognizer = TranscriptRecognizer::from_file("song.json")?;
//! let sync = LyricsSync::new(Arc::new(recognizer), SyncConfig::default())?;
//!
//! let output = sync.synchronize(&audio, "Hello world\nGoodbye moon")?;
//! println!("{}", output.lyrics_file);
//! ```

/// Lyric-to-recognition alignment
pub mod align;
/// Run settings
pub mod config;
/// Core audio and token types
pub mod core;
/// Audio decoder implementations
pub mod decoder;
/// Audio encoder implementations
pub mod encoder;
/// Error types
pub mod error;
/// Audio filter implementations
pub mod filter;
/// LRC and word-list output
pub mod format;
/// Reference lyric tokenization
pub mod lyrics;
/// Audio segmentation
pub mod processor;
/// Speech recognition adapters
pub mod recognizer;
/// End-to-end pipeline
pub mod sync;

pub use config::{AlignConfig, SegmentationStrategy, SyncConfig};
pub use core::{AudioSignal, Channels, RecognizedToken, Word};
pub use error::{SyncError, SyncResult};
pub use sync::{align_transcript, LyricsSync, SyncOutput, SyncQuality};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
