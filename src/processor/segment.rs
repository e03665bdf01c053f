use crate::core::AudioSignal;
use crate::error::{SyncError, SyncResult};
use std::time::Duration;

/// A bounded slice of the full recording handed to the recognizer
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position of this segment in the segment sequence
    pub index: usize,
    /// Seconds from the start of the full recording
    pub global_offset: f64,
    /// The audio of this window
    pub signal: AudioSignal,
}

impl Segment {
    /// Length of the segment in seconds
    pub fn duration_secs(&self) -> f64 {
        self.signal.duration_secs()
    }

    /// Global end time in seconds
    pub fn global_end(&self) -> f64 {
        self.global_offset + self.duration_secs()
    }

    /// Global time at the middle of the window
    pub fn center(&self) -> f64 {
        self.global_offset + self.duration_secs() / 2.0
    }

    /// Whether global time `t` falls inside `[offset, end]`
    pub fn contains(&self, t: f64) -> bool {
        t >= self.global_offset && t <= self.global_end()
    }
}

/// Cut a signal at the given frame boundaries.
///
/// `bounds` holds `(start, end)` frame pairs; empty ranges are skipped so no
/// zero-length segment is ever produced.
pub(crate) fn cut(signal: &AudioSignal, bounds: &[(usize, usize)]) -> SyncResult<Vec<Segment>> {
    let rate = signal.sample_rate() as f64;
    let mut segments = Vec::with_capacity(bounds.len());

    for &(start, end) in bounds.iter().filter(|(s, e)| e > s) {
        segments.push(Segment {
            index: segments.len(),
            global_offset: start as f64 / rate,
            signal: signal.slice_frames(start, end)?,
        });
    }

    Ok(segments)
}

/// Fixed-length windows advanced by a hop.
///
/// A hop shorter than the window makes neighbouring segments overlap, which
/// keeps words sung across a boundary whole in at least one of them.
#[derive(Debug, Clone)]
pub struct FixedWindowSegmenter {
    /// Window length
    window: Duration,
    /// Distance between window starts
    hop: Duration,
}

impl FixedWindowSegmenter {
    /// Create a new segmenter
    pub fn new(window: Duration, hop: Duration) -> SyncResult<Self> {
        if window.is_zero() || hop.is_zero() {
            return Err(SyncError::SegmentationError(
                "Window and hop must be greater than zero".to_string(),
            ));
        }
        if hop > window {
            return Err(SyncError::SegmentationError(format!(
                "Hop {:?} exceeds window {:?}",
                hop, window
            )));
        }

        Ok(FixedWindowSegmenter { window, hop })
    }

    /// Calculate the number of frames per window at `sample_rate`
    pub fn frames_per_window(&self, sample_rate: u32) -> usize {
        ((self.window.as_secs_f64() * sample_rate as f64).round() as usize).max(1)
    }

    fn frames_per_hop(&self, sample_rate: u32) -> usize {
        ((self.hop.as_secs_f64() * sample_rate as f64).round() as usize).max(1)
    }

    /// Window frame ranges for a signal of `total` frames
    fn bounds(&self, total: usize, sample_rate: u32) -> Vec<(usize, usize)> {
        let window = self.frames_per_window(sample_rate);
        let hop = self.frames_per_hop(sample_rate).min(window);

        let mut bounds = Vec::new();
        let mut start = 0;
        while start < total {
            let end = (start + window).min(total);
            bounds.push((start, end));
            if end == total {
                break;
            }
            start += hop;
        }
        bounds
    }
}

impl super::Segmenter for FixedWindowSegmenter {
    fn name(&self) -> &str {
        "fixed"
    }

    fn segment(&self, signal: &AudioSignal) -> SyncResult<Vec<Segment>> {
        cut(signal, &self.bounds(signal.frames(), signal.sample_rate()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Segmenter;

    fn silence(secs: f64, rate: u32) -> AudioSignal {
        AudioSignal::mono(vec![0.0; (secs * rate as f64) as usize], rate).unwrap()
    }

    #[test]
    fn test_segmenter_creation() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        assert_eq!(s.frames_per_window(44100), 44100);
    }

    #[test]
    fn test_segmenter_invalid_params() {
        assert!(FixedWindowSegmenter::new(Duration::ZERO, Duration::from_secs(1)).is_err());
        assert!(FixedWindowSegmenter::new(Duration::from_secs(1), Duration::ZERO).is_err());
        assert!(
            FixedWindowSegmenter::new(Duration::from_secs(1), Duration::from_secs(2)).is_err()
        );
    }

    #[test]
    fn test_split_without_overlap() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        let segments = s.segment(&silence(2.5, 100)).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].signal.frames(), 100);
        assert_eq!(segments[2].signal.frames(), 50);
        assert_eq!(segments[1].global_offset, 1.0);
        assert_eq!(segments[2].global_offset, 2.0);
        assert_eq!(segments[2].index, 2);
    }

    #[test]
    fn test_short_signal_is_one_segment() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(15), Duration::from_secs(15)).unwrap();
        let segments = s.segment(&silence(4.0, 100)).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].global_offset, 0.0);
        assert_eq!(segments[0].signal.frames(), 400);
    }

    #[test]
    fn test_overlapping_windows_cover_signal() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(2), Duration::from_secs(1)).unwrap();
        let segments = s.segment(&silence(4.5, 100)).unwrap();

        // Windows start at 0, 1, 2, 3; the last one reaches the end
        assert_eq!(segments.len(), 4);
        for pair in segments.windows(2) {
            assert!(pair[1].global_offset >= pair[0].global_offset);
            assert!(pair[1].global_offset <= pair[0].global_end());
        }
        assert!((segments.last().unwrap().global_end() - 4.5).abs() < 1e-9);
        assert!(segments.iter().all(|seg| seg.signal.frames() > 0));
    }

    #[test]
    fn test_empty_signal_yields_no_segments() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        let empty = AudioSignal::mono(Vec::new(), 16000).unwrap();
        assert!(s.segment(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_segment_center_and_contains() {
        let s = FixedWindowSegmenter::new(Duration::from_secs(2), Duration::from_secs(2)).unwrap();
        let segments = s.segment(&silence(4.0, 10)).unwrap();
        assert_eq!(segments[1].center(), 3.0);
        assert!(segments[1].contains(2.0));
        assert!(!segments[1].contains(1.9));
    }
}
