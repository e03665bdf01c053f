use crate::core::{TimedReferenceToken, Word};

/// Render seconds as an LRC tag body: `mm:ss.xx`.
///
/// Rounded to hundredths; minutes keep counting past 99.
pub fn format_timestamp(secs: f64) -> String {
    let hundredths = (secs.max(0.0) * 100.0).round() as u64;
    format!(
        "{:02}:{:02}.{:02}",
        hundredths / 6000,
        (hundredths / 100) % 60,
        hundredths % 100
    )
}

/// One displayed lyric line
#[derive(Debug, Clone, PartialEq)]
pub struct LrcLine {
    /// When the line is shown, in seconds
    pub time: f64,
    /// Original words joined by one space; empty for a blank lyric line
    pub text: String,
}

impl std::fmt::Display for LrcLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]{}", format_timestamp(self.time), self.text)
    }
}

/// Group timed tokens into `line_count` lines.
///
/// A line is shown at its first word's start. A blank line carries no words,
/// so it is shown when the previous line's last word ends (or at `0.0`),
/// marking the pause.
pub fn group_lines(tokens: &[TimedReferenceToken], line_count: usize) -> Vec<LrcLine> {
    let mut lines = Vec::with_capacity(line_count);
    let mut rest = tokens;
    let mut last_end = 0.0;

    for line_index in 0..line_count {
        let len = rest
            .iter()
            .take_while(|t| t.token.line_index == line_index)
            .count();
        let (words, tail) = rest.split_at(len);
        rest = tail;

        match (words.first(), words.last()) {
            (Some(first), Some(last)) => {
                lines.push(LrcLine {
                    time: first.start,
                    text: words
                        .iter()
                        .map(|t| t.token.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                });
                last_end = last.end;
            }
            _ => lines.push(LrcLine {
                time: last_end,
                text: String::new(),
            }),
        }
    }

    lines
}

/// Render the LRC document: one tag per line, `\n`-separated, no trailing
/// newline and no metadata tags.
pub fn render(tokens: &[TimedReferenceToken], line_count: usize) -> String {
    group_lines(tokens, line_count)
        .iter()
        .map(LrcLine::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flat word list for word-level highlighting
pub fn words(tokens: &[TimedReferenceToken]) -> Vec<Word> {
    tokens.iter().map(TimedReferenceToken::to_word).collect()
}
