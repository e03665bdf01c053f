//! End-to-end synchronization pipeline

use crate::align::{AlignmentStats, LyricAligner};
use crate::config::{AlignConfig, SyncConfig};
use crate::core::{AudioSignal, RecognizedToken, Word};
use crate::error::{SyncError, SyncResult};
use crate::filter::prepare_for_recognition;
use crate::format;
use crate::lyrics::{tokenize, ReferenceText};
use crate::processor;
use crate::recognizer::{transcribe_segments, Recognizer, TranscribeOptions};
use log::{info, warn};
use std::sync::Arc;

/// Whether the timings came from the audio at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncQuality {
    /// At least one recognized word was available to align against
    Aligned,
    /// Nothing was recognized; every word is interpolated over the duration
    Degenerate,
}

/// Result of a synchronization run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutput {
    /// One timed word per lyric token, in lyric order
    pub words: Vec<Word>,
    /// LRC document, one tag per lyric line
    pub lyrics_file: String,
    /// Aligned or degenerate
    pub quality: SyncQuality,
    /// Alignment counts
    pub stats: AlignmentStats,
    /// Segments whose recognition failed or timed out
    pub failed_segments: usize,
}

/// Synchronizes lyric text to audio using a speech recognizer
pub struct LyricsSync {
    recognizer: Arc<dyn Recognizer>,
    config: SyncConfig,
}

impl LyricsSync {
    /// Create a synchronizer; rejects an invalid config
    pub fn new(recognizer: Arc<dyn Recognizer>, config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(LyricsSync { recognizer, config })
    }

    /// Active settings
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Time every word of `lyric_text` against `audio`.
    ///
    /// Fails only on unusable input (no lyric tokens, no audio). Segments the
    /// recognizer cannot handle count as silence, and a run with nothing
    /// recognized still returns evenly interpolated timings.
    pub fn synchronize(&self, audio: &AudioSignal, lyric_text: &str) -> SyncResult<SyncOutput> {
        let reference = reference_tokens(lyric_text)?;
        if audio.is_empty() {
            return Err(SyncError::input("no audio"));
        }

        let duration = audio.duration_secs();
        info!(
            "Synchronizing {} lyric words over {:.2}s of audio",
            reference.tokens.len(),
            duration
        );

        let prepared = prepare_for_recognition(audio, self.config.target_sample_rate)?;
        let segmenter = processor::from_config(&self.config)?;
        let segments = segmenter.segment(&prepared)?;
        info!("{} segmentation produced {} segments", segmenter.name(), segments.len());

        let (recognized, failed_segments) = transcribe_segments(
            Arc::clone(&self.recognizer),
            segments,
            TranscribeOptions {
                workers: self.config.workers,
                timeout: self.config.recognition_timeout()?,
            },
        );
        if failed_segments > 0 {
            warn!("{} segments produced no recognition", failed_segments);
        }

        let mut output = align_reference(&reference, &recognized, duration, &self.config.align);
        output.failed_segments = failed_segments;
        Ok(output)
    }
}

/// Align lyric text against an already recognized, globally timed word
/// sequence. No audio processing happens here.
pub fn align_transcript(
    tokens: &[RecognizedToken],
    lyric_text: &str,
    duration: f64,
    config: &AlignConfig,
) -> SyncResult<SyncOutput> {
    config.validate()?;
    let reference = reference_tokens(lyric_text)?;

    let mut ordered = tokens.to_vec();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    Ok(align_reference(&reference, &ordered, duration, config))
}

fn reference_tokens(lyric_text: &str) -> SyncResult<ReferenceText> {
    let reference = tokenize(lyric_text);
    if reference.is_empty() {
        return Err(SyncError::input("lyric text contains no words"));
    }
    Ok(reference)
}

fn align_reference(
    reference: &ReferenceText,
    recognized: &[RecognizedToken],
    duration: f64,
    config: &AlignConfig,
) -> SyncOutput {
    let quality = if recognized.is_empty() {
        warn!("Nothing recognized; spreading lyrics evenly over {:.2}s", duration);
        SyncQuality::Degenerate
    } else {
        SyncQuality::Aligned
    };

    let alignment = LyricAligner::new(config.clone()).align(&reference.tokens, recognized, duration);
    info!(
        "Timed {} words ({} anchored, {} interpolated)",
        alignment.tokens.len(),
        alignment.stats.anchored(),
        alignment.stats.interpolated
    );

    SyncOutput {
        words: format::lrc::words(&alignment.tokens),
        lyrics_file: format::render(&alignment.tokens, reference.line_count),
        quality,
        stats: alignment.stats,
        failed_segments: 0,
    }
}
