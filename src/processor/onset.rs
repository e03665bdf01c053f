use super::segment::{cut, Segment};
use crate::core::AudioSignal;
use crate::error::{SyncError, SyncResult};
use log::debug;
use std::time::Duration;

/// Analysis frame length in samples
const FRAME_LEN: usize = 2048;
/// Analysis hop in samples
const FRAME_HOP: usize = 512;
/// Standard deviations above the mean flux an onset must reach
const SENSITIVITY: f32 = 1.0;

/// Segmenter that cuts at detected onsets instead of fixed positions.
///
/// Onsets are peaks of positive RMS-energy flux, backtracked to the preceding
/// energy minimum so a cut lands just before the attack rather than on it.
/// Segments never exceed the window; when no onset falls inside
/// `[min_len, window]` the cut is forced at the window edge.
#[derive(Debug, Clone)]
pub struct OnsetSegmenter {
    window: Duration,
    min_len: Duration,
}

impl OnsetSegmenter {
    /// Create an onset segmenter bounded by `window` and `min_len`
    pub fn new(window: Duration, min_len: Duration) -> SyncResult<Self> {
        if window.is_zero() {
            return Err(SyncError::SegmentationError(
                "Window must be greater than zero".to_string(),
            ));
        }
        if min_len > window {
            return Err(SyncError::SegmentationError(format!(
                "Minimum segment {:?} exceeds window {:?}",
                min_len, window
            )));
        }
        Ok(OnsetSegmenter { window, min_len })
    }

    fn frame_energies(signal: &AudioSignal) -> Vec<f32> {
        let width = signal.channels().count() as usize;
        let samples = signal.samples();
        let frames = signal.frames();

        let mut energies = Vec::new();
        let mut start = 0;
        while start + FRAME_LEN <= frames {
            let slice = &samples[start * width..(start + FRAME_LEN) * width];
            let sum_squared: f32 = slice.iter().map(|&s| s * s).sum();
            energies.push((sum_squared / slice.len() as f32).sqrt());
            start += FRAME_HOP;
        }
        energies
    }

    /// Onset positions, in frames of the signal, in ascending order
    pub fn detect_onsets(signal: &AudioSignal) -> Vec<usize> {
        let energies = Self::frame_energies(signal);
        if energies.len() < 3 {
            return Vec::new();
        }

        let flux: Vec<f32> = std::iter::once(0.0)
            .chain(energies.windows(2).map(|w| (w[1] - w[0]).max(0.0)))
            .collect();

        let mean = flux.iter().sum::<f32>() / flux.len() as f32;
        let variance = flux.iter().map(|f| (f - mean).powi(2)).sum::<f32>() / flux.len() as f32;
        let threshold = mean + SENSITIVITY * variance.sqrt();

        let mut onsets = Vec::new();
        for k in 1..flux.len() - 1 {
            let is_peak = flux[k] >= flux[k - 1] && flux[k] > flux[k + 1];
            if flux[k] > threshold && is_peak {
                let mut j = k;
                while j > 0 && energies[j - 1] < energies[j] {
                    j -= 1;
                }
                onsets.push(j * FRAME_HOP);
            }
        }
        onsets.dedup();
        onsets
    }

    /// Greedy cut placement over detected onsets
    fn bounds(&self, onsets: &[usize], total: usize, sample_rate: u32) -> Vec<(usize, usize)> {
        let rate = sample_rate as f64;
        let window = ((self.window.as_secs_f64() * rate).round() as usize).max(1);
        let min_len = (self.min_len.as_secs_f64() * rate).round() as usize;

        let mut bounds = Vec::new();
        let mut start = 0;
        while start < total {
            if total - start <= window {
                bounds.push((start, total));
                break;
            }
            let cut = onsets
                .iter()
                .copied()
                .filter(|&o| o >= start + min_len.max(1) && o <= start + window)
                .next_back()
                .unwrap_or(start + window);
            bounds.push((start, cut));
            start = cut;
        }
        bounds
    }
}

impl super::Segmenter for OnsetSegmenter {
    fn name(&self) -> &str {
        "onset"
    }

    fn segment(&self, signal: &AudioSignal) -> SyncResult<Vec<Segment>> {
        let onsets = Self::detect_onsets(signal);
        debug!("Detected {} onsets", onsets.len());
        cut(
            signal,
            &self.bounds(&onsets, signal.frames(), signal.sample_rate()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Segmenter;

    const RATE: u32 = 16000;

    /// Silence with half-second 440 Hz bursts starting at `bursts` seconds
    fn bursts(total_secs: f64, bursts: &[f64]) -> AudioSignal {
        let total = (total_secs * RATE as f64) as usize;
        let mut samples = vec![0.0f32; total];
        for &at in bursts {
            let from = (at * RATE as f64) as usize;
            let to = (from + RATE as usize / 2).min(total);
            for (i, s) in samples[from..to].iter_mut().enumerate() {
                *s = 0.5 * (i as f32 * 440.0 * std::f32::consts::TAU / RATE as f32).sin();
            }
        }
        AudioSignal::mono(samples, RATE).unwrap()
    }

    #[test]
    fn test_detect_onsets_near_bursts() {
        let signal = bursts(6.0, &[1.0, 3.0, 5.0]);
        let onsets: Vec<f64> = OnsetSegmenter::detect_onsets(&signal)
            .into_iter()
            .map(|o| o as f64 / RATE as f64)
            .collect();

        assert_eq!(onsets.len(), 3, "onsets: {:?}", onsets);
        for (found, expected) in onsets.iter().zip([1.0, 3.0, 5.0]) {
            assert!(*found <= expected && *found > expected - 0.3, "{found} vs {expected}");
        }
    }

    #[test]
    fn test_cuts_land_before_onsets() {
        let segmenter =
            OnsetSegmenter::new(Duration::from_secs_f64(2.5), Duration::from_secs_f64(0.5))
                .unwrap();
        let segments = segmenter.segment(&bursts(6.0, &[1.0, 3.0, 5.0])).unwrap();

        assert_eq!(segments.len(), 4);
        for (segment, burst) in segments[1..].iter().zip([1.0, 3.0, 5.0]) {
            assert!(segment.global_offset <= burst && segment.global_offset > burst - 0.3);
        }
        // Contiguous, bounded, non-empty
        for pair in segments.windows(2) {
            assert!((pair[0].global_end() - pair[1].global_offset).abs() < 1e-9);
        }
        assert!(segments.iter().all(|s| s.duration_secs() <= 2.5 + 1e-9));
        assert!((segments.last().unwrap().global_end() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_silence_falls_back_to_hard_cuts() {
        let segmenter =
            OnsetSegmenter::new(Duration::from_secs(2), Duration::from_secs(1)).unwrap();
        let segments = segmenter.segment(&bursts(5.0, &[])).unwrap();

        let offsets: Vec<f64> = segments.iter().map(|s| s.global_offset).collect();
        assert_eq!(offsets, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(OnsetSegmenter::new(Duration::ZERO, Duration::ZERO).is_err());
        assert!(OnsetSegmenter::new(Duration::from_secs(1), Duration::from_secs(2)).is_err());
    }
}
