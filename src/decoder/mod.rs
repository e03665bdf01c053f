//! Audio decoder implementations

pub mod symphonia;

pub use symphonia::SymphoniaDecoder;

use crate::core::AudioSignal;
use crate::error::{SyncError, SyncResult};
use log::info;
use std::path::Path;

/// Trait for audio decoders
pub trait Decoder: Send {
    /// Get next chunk of decoded audio from the stream
    ///
    /// `None` marks the end of the stream.
    fn decode_chunk(&mut self) -> SyncResult<Option<AudioSignal>>;
}

/// Create a decoder from a file path
pub fn from_file<P: AsRef<Path>>(path: P) -> SyncResult<Box<dyn Decoder>> {
    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}

/// Decode a whole stream into one signal
pub fn decode_all(decoder: &mut dyn Decoder) -> SyncResult<AudioSignal> {
    let mut samples = Vec::new();
    let mut format = None;

    while let Some(chunk) = decoder.decode_chunk()? {
        let (rate, channels) = *format.get_or_insert((chunk.sample_rate(), chunk.channels()));
        if chunk.sample_rate() != rate {
            return Err(SyncError::InvalidSampleRate {
                rate: chunk.sample_rate(),
            });
        }
        if chunk.channels() != channels {
            return Err(SyncError::InvalidChannels {
                expected: channels.count(),
                got: chunk.channels().count(),
            });
        }
        samples.extend_from_slice(chunk.samples());
    }

    let (rate, channels) =
        format.ok_or_else(|| SyncError::input("no audio: stream decoded to zero samples"))?;
    AudioSignal::new(samples, rate, channels)
}

/// Decode an audio file into one signal
pub fn decode_file<P: AsRef<Path>>(path: P) -> SyncResult<AudioSignal> {
    let path = path.as_ref();
    let mut decoder = from_file(path)?;
    let signal = decode_all(decoder.as_mut())?;
    info!(
        "Decoded {:?}: {:.2}s at {} Hz ({})",
        path,
        signal.duration_secs(),
        signal.sample_rate(),
        signal.channels().name()
    );
    Ok(signal)
}
