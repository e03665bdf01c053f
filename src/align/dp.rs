use super::similarity::{classify, Pairing};
use crate::config::AlignConfig;
use std::cmp::Reverse;

/// Back-pointer stored per DP cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Step {
    Origin = 0,
    Diagonal = 1,
    SkipReference = 2,
    SkipRecognized = 3,
}

impl Step {
    fn from_u8(value: u8) -> Step {
        match value {
            1 => Step::Diagonal,
            2 => Step::SkipReference,
            3 => Step::SkipRecognized,
            _ => Step::Origin,
        }
    }
}

/// Accumulated path quality. Ordered by cost, then more exact matches, then
/// fewer skipped lyric words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Score {
    cost: u32,
    exact: u32,
    reference_skips: u32,
}

impl Score {
    fn key(&self) -> (u32, Reverse<u32>, u32) {
        (self.cost, Reverse(self.exact), self.reference_skips)
    }

    fn skip_reference(self, cost: u32) -> Score {
        Score {
            cost: self.cost + cost,
            reference_skips: self.reference_skips + 1,
            ..self
        }
    }

    fn skip_recognized(self, cost: u32) -> Score {
        Score {
            cost: self.cost + cost,
            ..self
        }
    }

    fn pair(self, pairing: Pairing, config: &AlignConfig) -> Score {
        let cost = if pairing.is_match() {
            0
        } else {
            config.substitution_cost
        };
        Score {
            cost: self.cost + cost,
            exact: self.exact + u32::from(pairing == Pairing::Exact),
            ..self
        }
    }
}

/// Result of the sequence alignment before any timing is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPath {
    /// For every reference word, the recognized index it was paired with
    pub pairs: Vec<Option<(usize, Pairing)>>,
    /// Recognized words that were discarded as noise
    pub rejected: usize,
}

/// Global alignment of reference words against recognized words.
///
/// Both inputs are normalized word forms. The cost matrix is an
/// `(n + 1) x (m + 1)` arena of one-byte back-pointers; scores are kept in two
/// rolling rows.
pub fn align_words(reference: &[&str], recognized: &[&str], config: &AlignConfig) -> EditPath {
    let n = reference.len();
    let m = recognized.len();
    let cols = m + 1;

    let mut steps = vec![Step::Origin as u8; (n + 1) * cols];
    let mut prev = vec![Score::default(); cols];
    let mut curr = vec![Score::default(); cols];

    for j in 1..=m {
        prev[j] = prev[j - 1].skip_recognized(config.recognized_skip_cost);
        steps[j] = Step::SkipRecognized as u8;
    }

    for i in 1..=n {
        let row = i * cols;
        curr[0] = prev[0].skip_reference(config.reference_skip_cost);
        steps[row] = Step::SkipReference as u8;

        for j in 1..=m {
            let pairing = classify(reference[i - 1], recognized[j - 1], config.near_match_threshold);

            // Candidate order doubles as the final tie-break
            let mut best = prev[j - 1].pair(pairing, config);
            let mut step = Step::Diagonal;

            let up = prev[j].skip_reference(config.reference_skip_cost);
            if up.key() < best.key() {
                best = up;
                step = Step::SkipReference;
            }

            let left = curr[j - 1].skip_recognized(config.recognized_skip_cost);
            if left.key() < best.key() {
                best = left;
                step = Step::SkipRecognized;
            }

            curr[j] = best;
            steps[row + j] = step as u8;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    let mut pairs = vec![None; n];
    let mut rejected = 0;
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match Step::from_u8(steps[i * cols + j]) {
            Step::Diagonal => {
                let pairing =
                    classify(reference[i - 1], recognized[j - 1], config.near_match_threshold);
                pairs[i - 1] = Some((j - 1, pairing));
                i -= 1;
                j -= 1;
            }
            Step::SkipReference => i -= 1,
            Step::SkipRecognized => {
                rejected += 1;
                j -= 1;
            }
            Step::Origin => break,
        }
    }

    EditPath { pairs, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(reference: &[&str], recognized: &[&str]) -> EditPath {
        align_words(reference, recognized, &AlignConfig::default())
    }

    fn indices(path: &EditPath) -> Vec<Option<usize>> {
        path.pairs.iter().map(|p| p.map(|(j, _)| j)).collect()
    }

    #[test]
    fn identical_sequences_pair_diagonally() {
        let path = run(&["hello", "world"], &["hello", "world"]);
        assert_eq!(indices(&path), vec![Some(0), Some(1)]);
        assert!(path.pairs.iter().all(|p| p.unwrap().1 == Pairing::Exact));
        assert_eq!(path.rejected, 0);
    }

    #[test]
    fn extra_recognized_word_is_rejected() {
        let path = run(&["one", "two"], &["one", "uh", "two"]);
        assert_eq!(indices(&path), vec![Some(0), Some(2)]);
        assert_eq!(path.rejected, 1);
    }

    #[test]
    fn missing_word_is_skipped() {
        let path = run(&["i", "will", "survive"], &["i", "survive"]);
        assert_eq!(indices(&path), vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn misheard_word_is_substituted() {
        let path = run(&["kiss", "the", "sky"], &["kiss", "this", "guy"]);
        // "the"/"this" and "sky"/"guy" substitute rather than skipping both sides
        assert_eq!(indices(&path), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(path.pairs[2].unwrap().1, Pairing::Substitute);
    }

    #[test]
    fn repeated_words_map_by_position() {
        let path = run(&["la", "la", "la"], &["la", "la", "la"]);
        assert_eq!(indices(&path), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn repeated_chorus_with_missing_repeat() {
        // One "go" was not heard; the two heard ones keep their order
        let path = run(&["go", "go", "go", "stop"], &["go", "go", "stop"]);
        let mapped = indices(&path);
        assert_eq!(mapped.iter().flatten().count(), 3);
        assert_eq!(mapped[3], Some(2));
        let heard: Vec<usize> = mapped.iter().flatten().copied().collect();
        assert!(heard.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tie_break_prefers_exact_matches() {
        // Pairing with "yeahh" (near) or "yeah" (exact) costs the same
        let path = run(&["yeah"], &["yeah", "yeahh"]);
        assert_eq!(path.pairs[0], Some((0, Pairing::Exact)));
        assert_eq!(path.rejected, 1);
    }

    #[test]
    fn tie_break_prefers_fewer_skipped_lyric_words() {
        let config = AlignConfig {
            substitution_cost: 1,
            reference_skip_cost: 1,
            recognized_skip_cost: 1,
            ..AlignConfig::default()
        };
        // Three substitutions-or-skips either way, one exact match either way;
        // only the second path leaves a lyric word ("zzz") unpaired
        //   yeah/zzz  world/yeahh  zzz/zzz   + "world" rejected
        //   yeah/yeahh  world/world          + two "zzz" rejected, lyric "zzz" skipped
        let path = align_words(
            &["yeah", "world", "zzz"],
            &["zzz", "yeahh", "zzz", "world"],
            &config,
        );

        assert_eq!(
            path.pairs,
            vec![
                Some((0, Pairing::Substitute)),
                Some((1, Pairing::Substitute)),
                Some((2, Pairing::Exact)),
            ]
        );
        assert_eq!(path.rejected, 1);
    }

    #[test]
    fn empty_inputs() {
        assert!(run(&[], &["x"]).pairs.is_empty());
        assert_eq!(run(&[], &["x", "y"]).rejected, 2);
        assert_eq!(indices(&run(&["x", "y"], &[])), vec![None, None]);
    }
}
