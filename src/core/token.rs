use serde::Serialize;

/// Confidence reported for words whose timing was interpolated
pub const INTERPOLATED_CONFIDENCE: f32 = 0.0;

/// A word heard by the recognizer, in global time (seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedToken {
    /// Text as emitted by the recognizer
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Recognizer confidence in [0, 1]
    pub confidence: f32,
}

impl RecognizedToken {
    /// Create a token, clamping `end` so it never precedes `start`
    pub fn new(text: impl Into<String>, start: f64, end: f64, confidence: f32) -> Self {
        RecognizedToken {
            text: text.into(),
            start,
            end: end.max(start),
            confidence,
        }
    }

    /// Midpoint of the token in seconds
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// The same token moved by `offset` seconds
    pub fn shifted(&self, offset: f64) -> Self {
        RecognizedToken {
            text: self.text.clone(),
            start: self.start + offset,
            end: self.end + offset,
            confidence: self.confidence,
        }
    }
}

/// One word of the known lyric text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    /// Display text, exactly as written in the lyric
    pub text: String,
    /// Lowercased, punctuation-free form used for comparison
    pub normalized_text: String,
    /// Zero-based line of the lyric this word belongs to
    pub line_index: usize,
    /// Zero-based position of the word within its line
    pub position_in_line: usize,
}

/// Where a reference token's timing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// Recognized word with identical normalized text
    Exact,
    /// Recognized word close enough in spelling
    Near,
    /// Recognized word at the same position with different text
    Substituted,
    /// No recognized word; time slice estimated from neighbours
    Interpolated,
}

/// A reference token with its assigned time span
#[derive(Debug, Clone, PartialEq)]
pub struct TimedReferenceToken {
    /// The reference word
    pub token: ReferenceToken,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// How the timing was obtained
    pub source: TimingSource,
}

impl TimedReferenceToken {
    /// Whether a recognized token supplied the timing directly
    pub fn matched(&self) -> bool {
        self.source != TimingSource::Interpolated
    }

    /// Externally visible shape of this token
    pub fn to_word(&self) -> Word {
        Word {
            text: self.token.text.clone(),
            start: self.start,
            end: self.end,
            confidence: if self.matched() {
                1.0
            } else {
                INTERPOLATED_CONFIDENCE
            },
        }
    }
}

/// A timed lyric word as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    /// Word as written in the lyric
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// 1.0 for anchored words, [`INTERPOLATED_CONFIDENCE`] otherwise
    pub confidence: f32,
}
