use crate::core::{AudioSignal, Channels};
use crate::error::{SyncError, SyncResult};
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// WAV audio encoder (32-bit float)
pub struct WavEncoder {
    writer: Option<WavWriter<std::io::BufWriter<std::fs::File>>>,
    sample_rate: u32,
    channels: Channels,
}

impl WavEncoder {
    /// Create a new WAV encoder to file
    pub fn new<P: AsRef<Path>>(path: P, sample_rate: u32, channels: Channels) -> SyncResult<Self> {
        let spec = WavSpec {
            channels: channels.count() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)?;

        Ok(WavEncoder {
            writer: Some(writer),
            sample_rate,
            channels,
        })
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, signal: &AudioSignal) -> SyncResult<()> {
        if signal.sample_rate() != self.sample_rate {
            return Err(SyncError::InvalidSampleRate {
                rate: signal.sample_rate(),
            });
        }

        if signal.channels() != self.channels {
            return Err(SyncError::InvalidChannels {
                expected: self.channels.count(),
                got: signal.channels().count(),
            });
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SyncError::EncodeError("Encoder already finalized".to_string()))?;

        for &sample in signal.samples() {
            writer.write_sample(sample)?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> SyncResult<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

/// Write a whole signal to a WAV file
pub fn write_wav<P: AsRef<Path>>(path: P, signal: &AudioSignal) -> SyncResult<()> {
    use super::Encoder;

    let mut encoder = WavEncoder::new(path, signal.sample_rate(), signal.channels())?;
    encoder.encode(signal)?;
    encoder.finalize()
}
