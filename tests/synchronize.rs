use lyricsync::recognizer::{Recognizer, TranscriptRecognizer};
use lyricsync::processor::Segment;
use lyricsync::{
    align_transcript, AlignConfig, AudioSignal, Channels, LyricsSync, RecognizedToken,
    SyncConfig, SyncError, SyncOutput, SyncQuality, SyncResult,
};
use std::sync::Arc;
use std::time::Duration;

fn rec(text: &str, start: f64, end: f64) -> RecognizedToken {
    RecognizedToken::new(text, start, end, 0.9)
}

fn align(tokens: &[RecognizedToken], lyric: &str, duration: f64) -> SyncOutput {
    align_transcript(tokens, lyric, duration, &AlignConfig::default()).unwrap()
}

fn assert_monotonic(output: &SyncOutput) {
    let mut prev: Option<(f64, f64)> = None;
    for word in &output.words {
        assert!(word.start >= 0.0, "{:?} starts before zero", word);
        assert!(word.end >= word.start, "{:?} ends before it starts", word);
        if let Some((start, end)) = prev {
            assert!(word.start >= start, "{:?} starts before previous word", word);
            assert!(word.end >= end, "{:?} ends before previous word", word);
        }
        prev = Some((word.start, word.end));
    }
}

#[test]
fn exact_match_copies_recognized_timing() {
    let output = align(&[rec("hello", 0.0, 0.5), rec("world", 0.6, 1.0)], "hello world", 1.0);

    let spans: Vec<(&str, f64, f64)> = output
        .words
        .iter()
        .map(|w| (w.text.as_str(), w.start, w.end))
        .collect();
    assert_eq!(spans, vec![("hello", 0.0, 0.5), ("world", 0.6, 1.0)]);
    assert_eq!(output.lyrics_file, "[00:00.00]hello world");
    assert_eq!(output.quality, SyncQuality::Aligned);
}

#[test]
fn noise_word_is_rejected() {
    let output = align(
        &[rec("hello", 0.0, 0.5), rec("uh", 0.5, 0.7), rec("world", 0.8, 1.2)],
        "hello world",
        2.0,
    );

    assert_eq!(output.words.len(), 2);
    assert_eq!(output.words[1].start, 0.8);
    assert_eq!(output.words[1].end, 1.2);
    assert_eq!(output.stats.exact, 2);
    assert_eq!(output.stats.rejected, 1);
}

#[test]
fn repeated_phrase_maps_positionally() {
    let output = align(
        &[rec("la", 1.0, 1.2), rec("la", 1.3, 1.5), rec("la", 1.6, 1.8)],
        "La la la",
        2.0,
    );

    let starts: Vec<f64> = output.words.iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![1.0, 1.3, 1.6]);
    assert_eq!(output.lyrics_file, "[00:01.00]La la la");
}

#[test]
fn full_miss_spreads_words_by_length() {
    let lyric = "a bb\ncccc";
    let output = align(&[], lyric, 7.0);

    assert_eq!(output.quality, SyncQuality::Degenerate);
    assert_eq!(output.stats.interpolated, 3);
    let spans: Vec<(f64, f64)> = output.words.iter().map(|w| (w.start, w.end)).collect();
    let expected = [(0.0, 1.0), (1.0, 3.0), (3.0, 7.0)];
    for ((start, end), (want_start, want_end)) in spans.iter().zip(expected) {
        assert!((start - want_start).abs() < 1e-9);
        assert!((end - want_end).abs() < 1e-9);
    }
    for pair in output.words.windows(2) {
        assert!(pair[1].start > pair[0].start);
    }
    assert!(output.words.iter().all(|w| w.confidence == 0.0));
}

#[test]
fn every_lyric_word_is_covered_in_order() {
    let lyric = "Is this the real life?\n\nIs this just fantasy?";
    let output = align(
        &[
            rec("is", 0.5, 0.7),
            rec("the", 1.0, 1.1),
            rec("reel", 1.2, 1.5),
            rec("life", 1.6, 2.4),
            rec("just", 6.0, 6.3),
            rec("fantasy", 6.4, 7.5),
        ],
        lyric,
        8.0,
    );

    let texts: Vec<&str> = output.words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(
        texts,
        ["Is", "this", "the", "real", "life?", "Is", "this", "just", "fantasy?"]
    );
    assert_eq!(output.lyrics_file.lines().count(), 3);
    assert_eq!(output.lyrics_file.lines().nth(1), Some("[00:02.40]"));
    assert_monotonic(&output);
}

#[test]
fn disordered_recognition_still_monotonic() {
    let output = align(
        &[
            rec("three", 0.2, 0.4),
            rec("one", 3.0, 5.0),
            rec("two", 2.0, 9.0),
            rec("four", 2.5, 2.6),
            rec("five", 20.0, 21.0),
        ],
        "one two three four five six",
        10.0,
    );

    assert_eq!(output.words.len(), 6);
    assert_monotonic(&output);
}

#[test]
fn alignment_is_idempotent() {
    let tokens = [
        rec("when", 0.3, 0.5),
        rec("i", 0.5, 0.6),
        rec("find", 0.7, 0.9),
        rec("myself", 1.0, 1.4),
        rec("trouble", 2.2, 2.8),
    ];
    let lyric = "When I find myself in times of trouble";

    assert_eq!(align(&tokens, lyric, 4.0), align(&tokens, lyric, 4.0));
}

#[test]
fn empty_lyric_is_rejected() {
    let result = align_transcript(&[rec("hi", 0.0, 1.0)], "\n  \n", 1.0, &AlignConfig::default());
    assert!(matches!(result, Err(SyncError::InputError(_))));
}

fn silent_stereo(secs: f64, rate: u32) -> AudioSignal {
    let frames = (secs * rate as f64) as usize;
    AudioSignal::new(vec![0.0; frames * 2], rate, Channels::Stereo).unwrap()
}

fn sync_config(workers: usize) -> SyncConfig {
    SyncConfig {
        workers,
        ..SyncConfig::default()
    }
}

#[test]
fn synchronize_replays_transcript_across_segments() {
    let transcript = vec![
        rec("hello", 1.0, 1.5),
        rec("world", 1.6, 2.0),
        rec("goodbye", 16.0, 16.5),
        rec("moon", 16.6, 17.2),
    ];
    let audio = silent_stereo(20.0, 22_050);
    let lyric = "Hello world\nGoodbye moon";

    let sync = LyricsSync::new(
        Arc::new(TranscriptRecognizer::new(transcript.clone())),
        sync_config(4),
    )
    .unwrap();
    let output = sync.synchronize(&audio, lyric).unwrap();

    assert_eq!(output.quality, SyncQuality::Aligned);
    assert_eq!(output.failed_segments, 0);
    assert_eq!(output.stats.exact, 4);
    for (word, heard) in output.words.iter().zip(&transcript) {
        assert!((word.start - heard.start).abs() < 1e-9);
        assert!((word.end - heard.end).abs() < 1e-9);
        assert_eq!(word.confidence, 1.0);
    }
    assert_eq!(
        output.lyrics_file,
        "[00:01.00]Hello world\n[00:16.00]Goodbye moon"
    );

    let serial = LyricsSync::new(Arc::new(TranscriptRecognizer::new(transcript)), sync_config(1))
        .unwrap()
        .synchronize(&audio, lyric)
        .unwrap();
    assert_eq!(serial, output);
}

/// Fails every segment after the first
struct Flaky {
    inner: TranscriptRecognizer,
}

impl Recognizer for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn recognize(
        &self,
        segment: &Segment,
        timeout: Option<Duration>,
    ) -> SyncResult<Vec<RecognizedToken>> {
        if segment.index > 0 {
            return Err(SyncError::DecodeError("model unavailable".to_string()));
        }
        self.inner.recognize(segment, timeout)
    }
}

#[test]
fn failed_segment_falls_back_to_interpolation() {
    let recognizer = Flaky {
        inner: TranscriptRecognizer::new(vec![
            rec("hello", 1.0, 1.5),
            rec("world", 1.6, 2.0),
            rec("goodbye", 16.0, 16.5),
        ]),
    };
    let sync = LyricsSync::new(Arc::new(recognizer), sync_config(2)).unwrap();
    let output = sync
        .synchronize(&silent_stereo(20.0, 16_000), "hello world goodbye")
        .unwrap();

    assert_eq!(output.failed_segments, 1);
    assert_eq!(output.stats.exact, 2);
    assert_eq!(output.stats.interpolated, 1);
    let last = &output.words[2];
    assert!((last.start - 2.0).abs() < 1e-9);
    assert!((last.end - 20.0).abs() < 1e-9);
    assert_monotonic(&output);
}
