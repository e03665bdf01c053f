//! Speech recognition adapters.
//!
//! The acoustic model is an external collaborator behind [`Recognizer`]. This
//! module runs it once per segment on a bounded worker pool, lifts the
//! segment-local word times onto the global timeline, and merges the results
//! into one time-ordered sequence. A segment whose recognition fails or times
//! out contributes no words; it never aborts the run.

pub mod command;
pub mod transcript;

pub use command::CommandRecognizer;
pub use transcript::{parse_transcript, TranscriptRecognizer};

use crate::core::RecognizedToken;
use crate::error::{SyncError, SyncResult};
use crate::processor::Segment;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Trait for speech-to-text backends
pub trait Recognizer: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Recognize one segment.
    ///
    /// Returned times are relative to the start of the segment. An empty list
    /// is a valid answer (instrumental passage). `timeout` is the segment's
    /// deadline; only backends that report [`Recognizer::enforces_timeout`]
    /// need to honour it.
    fn recognize(
        &self,
        segment: &Segment,
        timeout: Option<Duration>,
    ) -> SyncResult<Vec<RecognizedToken>>;

    /// Whether `recognize` stops on its own at the deadline and releases
    /// everything it started. Other backends are abandoned on a detached
    /// thread instead.
    fn enforces_timeout(&self) -> bool {
        false
    }
}

/// Words recognized in one segment, already on the global timeline
#[derive(Debug, Clone)]
struct SegmentWords {
    index: usize,
    tokens: Vec<RecognizedToken>,
}

/// Worker pool settings for [`transcribe_segments`]
#[derive(Debug, Clone, Copy)]
pub struct TranscribeOptions {
    /// Parallel recognizer calls
    pub workers: usize,
    /// Deadline per segment, `None` waits forever
    pub timeout: Option<Duration>,
}

/// Run `recognizer` on every segment and merge the results.
///
/// Returns the merged global sequence and the number of segments that failed
/// or timed out.
pub fn transcribe_segments(
    recognizer: Arc<dyn Recognizer>,
    segments: Vec<Segment>,
    options: TranscribeOptions,
) -> (Vec<RecognizedToken>, usize) {
    let segments: Vec<Arc<Segment>> = segments.into_iter().map(Arc::new).collect();
    let next = AtomicUsize::new(0);
    let workers = options.workers.clamp(1, segments.len().max(1));
    let (tx, rx) = mpsc::channel::<(usize, SyncResult<Vec<RecognizedToken>>)>();

    debug!(
        "Recognizing {} segments with {} on {} workers",
        segments.len(),
        recognizer.name(),
        workers
    );

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let recognizer = Arc::clone(&recognizer);
            let segments = &segments;
            let next = &next;
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(segment) = segments.get(index) else {
                    break;
                };
                let result = recognize_with_deadline(&recognizer, segment, options.timeout);
                if tx.send((index, result)).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    let mut failed = 0;
    let mut per_segment = Vec::with_capacity(segments.len());
    for (index, result) in rx {
        let segment = &segments[index];
        match result {
            Ok(tokens) => {
                debug!("Segment {}: {} words", index, tokens.len());
                per_segment.push(SegmentWords {
                    index,
                    tokens: tokens
                        .iter()
                        .map(|t| t.shifted(segment.global_offset))
                        .collect(),
                });
            }
            Err(e) => {
                warn!("{}; treating segment as silent", e);
                failed += 1;
            }
        }
    }

    (merge_segments(&segments, per_segment), failed)
}

/// Call the recognizer, giving up after `timeout`.
///
/// Backends that enforce the deadline themselves run inline. Otherwise the
/// call runs on its own thread so a stuck backend can be abandoned; its late
/// result is dropped.
fn recognize_with_deadline(
    recognizer: &Arc<dyn Recognizer>,
    segment: &Arc<Segment>,
    timeout: Option<Duration>,
) -> SyncResult<Vec<RecognizedToken>> {
    let timeout = match timeout {
        Some(timeout) if !recognizer.enforces_timeout() => timeout,
        _ => {
            return recognizer
                .recognize(segment, timeout)
                .map_err(|e| unavailable(segment.index, e));
        }
    };

    let (tx, rx) = mpsc::channel();
    let job_recognizer = Arc::clone(recognizer);
    let job_segment = Arc::clone(segment);
    thread::spawn(move || {
        let _ = tx.send(job_recognizer.recognize(&job_segment, Some(timeout)));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result.map_err(|e| unavailable(segment.index, e)),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(SyncError::recognition(
            segment.index,
            format!("timed out after {:.1}s", timeout.as_secs_f64()),
        )),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SyncError::recognition(
            segment.index,
            "recognizer thread panicked",
        )),
    }
}

fn unavailable(index: usize, err: SyncError) -> SyncError {
    match err {
        SyncError::RecognitionUnavailable { .. } => err,
        other => SyncError::recognition(index, other),
    }
}

/// Position of the segment whose window centre is closest to `t` among those
/// containing it; ties go to the earlier segment.
fn owning_segment(segments: &[Arc<Segment>], t: f64) -> Option<usize> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.contains(t))
        .min_by(|(ia, a), (ib, b)| {
            (a.center() - t)
                .abs()
                .total_cmp(&(b.center() - t).abs())
                .then(ia.cmp(ib))
        })
        .map(|(i, _)| i)
}

/// Merge per-segment words into one time-ordered sequence.
///
/// In overlap regions a word is kept only from the segment that owns its
/// midpoint, which removes duplicates and favours the copy heard furthest
/// from a window edge. Output order depends only on the words, never on
/// which worker finished first.
fn merge_segments(segments: &[Arc<Segment>], per_segment: Vec<SegmentWords>) -> Vec<RecognizedToken> {
    let mut merged: Vec<(usize, RecognizedToken)> = per_segment
        .into_iter()
        .flat_map(|words| {
            let index = words.index;
            words.tokens.into_iter().map(move |t| (index, t))
        })
        .filter(|(index, token)| {
            // Words past a window edge belong to whoever owns that time, or to
            // the emitting segment if nobody does
            owning_segment(segments, token.midpoint()).is_none_or(|owner| owner == *index)
        })
        .collect();

    merged.sort_by(|(ia, a), (ib, b)| {
        a.start
            .total_cmp(&b.start)
            .then(a.end.total_cmp(&b.end))
            .then(ia.cmp(ib))
    });

    merged.into_iter().map(|(_, t)| t).collect()
}
