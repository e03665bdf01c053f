//! Audio filter implementations

pub mod remix;
pub mod resample;

pub use remix::Remix;
pub use resample::Resample;

use crate::core::AudioSignal;
use crate::error::SyncResult;

/// Trait for audio filters
pub trait Filter {
    /// Process a signal through this filter
    fn process(&mut self, signal: &AudioSignal) -> SyncResult<AudioSignal>;
}

/// Down-mix to mono and resample to `target_rate`, the shape every
/// recognizer receives.
pub fn prepare_for_recognition(signal: &AudioSignal, target_rate: u32) -> SyncResult<AudioSignal> {
    let mono = Remix::to_mono().process(signal)?;
    Resample::new(target_rate)?.process(&mono)
}
