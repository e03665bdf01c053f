use crate::core::RecognizedToken;
use crate::error::{SyncError, SyncResult};
use crate::processor::Segment;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn default_probability() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(alias = "text")]
    word: String,
    start: f64,
    end: f64,
    #[serde(alias = "confidence", default = "default_probability")]
    probability: f32,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    words: Vec<RawWord>,
}

/// Shapes of recognizer output we accept
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Document { segments: Vec<RawSegment> },
    Segments(Vec<RawSegment>),
    Words(Vec<RawWord>),
}

impl RawTranscript {
    fn into_words(self) -> Vec<RawWord> {
        match self {
            RawTranscript::Document { segments } | RawTranscript::Segments(segments) => {
                segments.into_iter().flat_map(|s| s.words).collect()
            }
            RawTranscript::Words(words) => words,
        }
    }
}

/// Parse word-timestamped recognizer JSON.
///
/// Accepts `{"segments": [{"words": [...]}]}`, a bare array of such segments,
/// or a flat array of words. Words with blank text are dropped; the rest are
/// returned sorted by start time.
pub fn parse_transcript(json: &str) -> SyncResult<Vec<RecognizedToken>> {
    let raw: RawTranscript = serde_json::from_str(json)?;

    let mut tokens: Vec<RecognizedToken> = raw
        .into_words()
        .into_iter()
        .filter_map(|w| {
            let text = w.word.trim();
            if text.is_empty() || !w.start.is_finite() || !w.end.is_finite() {
                return None;
            }
            Some(RecognizedToken::new(text, w.start, w.end, w.probability))
        })
        .collect();

    tokens.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
    Ok(tokens)
}

/// Replays a transcript of the whole track, produced ahead of time by an
/// external recognizer, as if it were recognized segment by segment.
///
/// A word belongs to every segment that contains its midpoint; overlap
/// duplicates are resolved later by the merge step like any live output.
#[derive(Debug, Clone)]
pub struct TranscriptRecognizer {
    tokens: Vec<RecognizedToken>,
}

impl TranscriptRecognizer {
    /// Wrap already-parsed global tokens
    pub fn new(tokens: Vec<RecognizedToken>) -> Self {
        TranscriptRecognizer { tokens }
    }

    /// Load a transcript JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let tokens = parse_transcript(&data).map_err(|e| {
            SyncError::TranscriptError(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::new(tokens))
    }

    /// Number of words in the transcript
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the transcript holds no words
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl super::Recognizer for TranscriptRecognizer {
    fn name(&self) -> &str {
        "transcript"
    }

    fn recognize(
        &self,
        segment: &Segment,
        _timeout: Option<Duration>,
    ) -> SyncResult<Vec<RecognizedToken>> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| segment.contains(t.midpoint()))
            .map(|t| t.shifted(-segment.global_offset))
            .collect())
    }
}
