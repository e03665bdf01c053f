use crate::core::{AudioSignal, Channels};
use crate::error::SyncResult;

/// Audio channel remixer - folds any layout down to mono
pub struct Remix;

impl Remix {
    /// Down-mix to mono
    pub fn to_mono() -> Self {
        Remix
    }

    /// Average every frame across all channels
    fn downmix(input: &[f32], width: usize) -> Vec<f32> {
        input
            .chunks_exact(width)
            .map(|frame| frame.iter().sum::<f32>() / width as f32)
            .collect()
    }
}

impl super::Filter for Remix {
    fn process(&mut self, signal: &AudioSignal) -> SyncResult<AudioSignal> {
        if signal.channels() == Channels::Mono {
            return Ok(signal.clone());
        }

        let width = signal.channels().count() as usize;
        AudioSignal::new(
            Self::downmix(signal.samples(), width),
            signal.sample_rate(),
            Channels::Mono,
        )
    }
}
