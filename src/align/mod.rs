//! Alignment of the trusted lyric against the recognizer's timed words.
//!
//! The recognizer hears words at the right time but often the wrong words;
//! the lyric has the right words but no time. [`LyricAligner`] pairs the two
//! sequences with a global edit-distance alignment, copies the recognizer's
//! timing onto every paired lyric word, interpolates the rest between those
//! anchors, and finally repairs any ordering violation so the output is
//! monotonic no matter what the recognizer produced.

pub mod dp;
pub mod interpolate;
pub mod similarity;

pub use dp::{align_words, EditPath};
pub use similarity::Pairing;

use crate::config::AlignConfig;
use crate::core::{RecognizedToken, ReferenceToken, TimedReferenceToken, TimingSource};
use log::debug;

/// Counts describing how an alignment was obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    /// Lyric words timed by an identical recognized word
    pub exact: usize,
    /// Lyric words timed by a near-identical recognized word
    pub near: usize,
    /// Lyric words timed by a different word at the same position
    pub substituted: usize,
    /// Lyric words timed by interpolation
    pub interpolated: usize,
    /// Recognized words discarded as noise
    pub rejected: usize,
}

impl AlignmentStats {
    /// Lyric words that received timing from the recognizer
    pub fn anchored(&self) -> usize {
        self.exact + self.near + self.substituted
    }
}

/// Timed lyric plus its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// One entry per reference token, in lyric order
    pub tokens: Vec<TimedReferenceToken>,
    /// How the timings were obtained
    pub stats: AlignmentStats,
}

/// Assigns a time span to every reference token
#[derive(Debug, Clone, Default)]
pub struct LyricAligner {
    config: AlignConfig,
}

impl LyricAligner {
    /// Create an aligner with the given costs
    pub fn new(config: AlignConfig) -> Self {
        LyricAligner { config }
    }

    /// Align `reference` against time-ordered `recognized` tokens.
    ///
    /// `duration` bounds trailing interpolation; it is extended to the last
    /// recognized end if the recognizer reports words past it.
    pub fn align(
        &self,
        reference: &[ReferenceToken],
        recognized: &[RecognizedToken],
        duration: f64,
    ) -> Alignment {
        if reference.is_empty() {
            return Alignment {
                tokens: Vec::new(),
                stats: AlignmentStats {
                    rejected: recognized.len(),
                    ..AlignmentStats::default()
                },
            };
        }

        let duration = recognized
            .iter()
            .map(|t| t.end)
            .fold(duration.max(0.0), f64::max);

        let recognized_norm: Vec<String> = recognized
            .iter()
            .map(|t| crate::lyrics::normalize_word(&t.text))
            .collect();
        let reference_words: Vec<&str> = reference
            .iter()
            .map(|t| t.normalized_text.as_str())
            .collect();
        let recognized_words: Vec<&str> = recognized_norm.iter().map(String::as_str).collect();

        let path = align_words(&reference_words, &recognized_words, &self.config);

        let mut stats = AlignmentStats {
            rejected: path.rejected,
            ..AlignmentStats::default()
        };

        let mut timed: Vec<TimedReferenceToken> = reference
            .iter()
            .zip(&path.pairs)
            .map(|(token, pair)| match *pair {
                Some((j, pairing)) => {
                    let source = match pairing {
                        Pairing::Exact => {
                            stats.exact += 1;
                            TimingSource::Exact
                        }
                        Pairing::Near => {
                            stats.near += 1;
                            TimingSource::Near
                        }
                        Pairing::Substitute => {
                            stats.substituted += 1;
                            TimingSource::Substituted
                        }
                    };
                    TimedReferenceToken {
                        token: token.clone(),
                        start: recognized[j].start,
                        end: recognized[j].end,
                        source,
                    }
                }
                None => {
                    stats.interpolated += 1;
                    interpolate::unanchored(token)
                }
            })
            .collect();

        interpolate::fill_gaps(&mut timed, duration);
        interpolate::enforce_monotonic(&mut timed);

        debug!(
            "Aligned {} lyric words against {} recognized: {} exact, {} near, {} substituted, {} interpolated, {} rejected",
            reference.len(),
            recognized.len(),
            stats.exact,
            stats.near,
            stats.substituted,
            stats.interpolated,
            stats.rejected
        );

        Alignment {
            tokens: timed,
            stats,
        }
    }
}
