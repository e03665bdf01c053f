//! Audio encoder implementations

pub mod wav;

pub use wav::{write_wav, WavEncoder};

use crate::core::AudioSignal;
use crate::error::SyncResult;

/// Trait for audio encoders
pub trait Encoder {
    /// Encode a signal to output
    fn encode(&mut self, signal: &AudioSignal) -> SyncResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> SyncResult<()> {
        Ok(())
    }
}
