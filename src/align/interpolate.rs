use crate::core::{ReferenceToken, TimedReferenceToken, TimingSource};

/// Time weight of a word: its normalized length, at least one
fn weight(token: &ReferenceToken) -> f64 {
    token.normalized_text.chars().count().max(1) as f64
}

/// Spread every run of interpolated tokens across the gap between its
/// anchors, proportionally to word length.
///
/// A run with no anchor before it starts at `0.0`; a run with no anchor after
/// it ends at `duration`. When the anchors are out of order the run collapses
/// onto the earlier bound.
pub fn fill_gaps(timed: &mut [TimedReferenceToken], duration: f64) {
    let n = timed.len();
    let mut i = 0;
    while i < n {
        if timed[i].matched() {
            i += 1;
            continue;
        }

        let run_end = (i..n).find(|&k| timed[k].matched()).unwrap_or(n);
        let t_before = if i > 0 { timed[i - 1].end } else { 0.0 };
        let t_after = if run_end < n {
            timed[run_end].start
        } else {
            duration
        };
        let t_after = t_after.max(t_before);

        let total: f64 = timed[i..run_end].iter().map(|t| weight(&t.token)).sum();
        let span = t_after - t_before;

        let mut elapsed = 0.0;
        for t in &mut timed[i..run_end] {
            let w = weight(&t.token);
            t.start = t_before + span * elapsed / total;
            elapsed += w;
            t.end = t_before + span * elapsed / total;
        }

        i = run_end;
    }
}

/// Force non-decreasing `start` and `end` over the whole sequence.
///
/// A start earlier than the previous start is moved to the previous end; an
/// end is raised to at least its own start and the previous end.
pub fn enforce_monotonic(timed: &mut [TimedReferenceToken]) {
    if let Some(first) = timed.first_mut() {
        first.start = first.start.max(0.0);
        first.end = first.end.max(first.start);
    }

    for i in 1..timed.len() {
        let (prev_start, prev_end) = (timed[i - 1].start, timed[i - 1].end);
        let t = &mut timed[i];
        if t.start < prev_start {
            t.start = prev_end;
        }
        if t.end < t.start {
            t.end = t.start;
        }
        if t.end < prev_end {
            t.end = prev_end;
        }
    }
}

/// Placeholder for a token awaiting interpolation
pub fn unanchored(token: &ReferenceToken) -> TimedReferenceToken {
    TimedReferenceToken {
        token: token.clone(),
        start: 0.0,
        end: 0.0,
        source: TimingSource::Interpolated,
    }
}
