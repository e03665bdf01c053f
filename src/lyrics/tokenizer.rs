use crate::core::ReferenceToken;

/// Tokenized lyric: the authoritative word sequence plus its line count.
///
/// Blank lines own no tokens, so `line_count` is the only record of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceText {
    /// Words in lyric order
    pub tokens: Vec<ReferenceToken>,
    /// Number of lines in the lyric, blank ones included
    pub line_count: usize,
}

impl ReferenceText {
    /// Whether the lyric contains no words at all
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Comparable form of a word: lowercase alphanumerics only.
///
/// Apostrophes, hyphens and other punctuation are removed, so `Don't` and
/// `dont` compare equal.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split lyric text into lines, then words
pub fn tokenize(text: &str) -> ReferenceText {
    let mut tokens = Vec::new();
    let mut line_count = 0;

    for (line_index, line) in text.lines().enumerate() {
        line_count = line_index + 1;
        for (position_in_line, word) in line.split_whitespace().enumerate() {
            tokens.push(ReferenceToken {
                text: word.to_string(),
                normalized_text: normalize_word(word),
                line_index,
                position_in_line,
            });
        }
    }

    ReferenceText { tokens, line_count }
}
