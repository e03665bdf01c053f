//! Output rendering

pub mod lrc;

pub use lrc::{format_timestamp, group_lines, render, LrcLine};

use crate::core::Word;
use crate::error::SyncResult;

/// Serialize the word list as pretty JSON
pub fn words_to_json(words: &[Word]) -> SyncResult<String> {
    Ok(serde_json::to_string_pretty(words)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_json_shape() {
        let words = vec![Word {
            text: "hello".to_string(),
            start: 0.0,
            end: 0.5,
            confidence: 1.0,
        }];
        let json: serde_json::Value = serde_json::from_str(&words_to_json(&words).unwrap()).unwrap();
        assert_eq!(json[0]["text"], "hello");
        assert_eq!(json[0]["end"], 0.5);
        assert_eq!(json[0]["confidence"], 1.0);
    }
}
