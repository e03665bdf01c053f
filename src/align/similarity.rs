//! Word comparison used by the aligner's diagonal step

/// Words shorter than this must match exactly
const MIN_NEAR_LEN: usize = 3;

/// How a lyric word relates to the recognized word it is paired with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Identical normalized text
    Exact,
    /// Spelling close enough to be the same sung word
    Near,
    /// Different words sharing a position
    Substitute,
}

impl Pairing {
    /// Whether the pair counts as a match (zero alignment cost)
    pub fn is_match(self) -> bool {
        matches!(self, Pairing::Exact | Pairing::Near)
    }
}

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let replace = prev[j] + usize::from(ca != cb);
            curr[j + 1] = replace.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / longer length`, in [0, 1]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Collapse runs of the same letter: sung vowels get stretched ("ooooh")
fn squeeze(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut last = None;
    for c in word.chars() {
        if last != Some(c) {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

/// Compare two normalized words.
///
/// Empty words never match anything, including each other.
pub fn classify(reference: &str, recognized: &str, near_threshold: f64) -> Pairing {
    if reference.is_empty() || recognized.is_empty() {
        return Pairing::Substitute;
    }
    if reference == recognized {
        return Pairing::Exact;
    }
    if squeeze(reference) == squeeze(recognized) {
        return Pairing::Near;
    }
    let long_enough = reference.chars().count() >= MIN_NEAR_LEN
        && recognized.chars().count() >= MIN_NEAR_LEN;
    if long_enough && similarity(reference, recognized) >= near_threshold {
        Pairing::Near
    } else {
        Pairing::Substitute
    }
}
