use crate::error::{SyncError, SyncResult};

/// Channel configuration for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Mono (1 channel)
    Mono = 1,
    /// Stereo (2 channels)
    Stereo = 2,
    /// Quad (4 channels)
    Quad = 4,
    /// 5.1 surround sound
    SurroundFivePointOne = 6,
    /// 7.1 surround sound
    SurroundSevenPointOne = 8,
}

impl Channels {
    /// Create Channels from channel count
    pub fn from_count(count: u32) -> SyncResult<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            4 => Ok(Channels::Quad),
            6 => Ok(Channels::SurroundFivePointOne),
            8 => Ok(Channels::SurroundSevenPointOne),
            n => Err(SyncError::InvalidChannels {
                expected: 1,
                got: n,
            }),
        }
    }

    /// Get the number of channels
    pub fn count(&self) -> u32 {
        *self as u32
    }

    /// Get channel layout name
    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "Mono",
            Channels::Stereo => "Stereo",
            Channels::Quad => "Quad",
            Channels::SurroundFivePointOne => "5.1 Surround",
            Channels::SurroundSevenPointOne => "7.1 Surround",
        }
    }
}

/// A fully decoded recording owned by one synchronization run.
///
/// Samples are interleaved f32 in `[-1.0, 1.0]`. The signal is never mutated
/// once built; filters produce new signals.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: Channels,
}

impl AudioSignal {
    /// Create a new signal from interleaved samples
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: Channels) -> SyncResult<Self> {
        if sample_rate == 0 {
            return Err(SyncError::InvalidSampleRate { rate: sample_rate });
        }

        if samples.len() % channels.count() as usize != 0 {
            return Err(SyncError::BufferError(
                "Sample count not divisible by channel count".to_string(),
            ));
        }

        Ok(AudioSignal {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Create a mono signal
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> SyncResult<Self> {
        Self::new(samples, sample_rate, Channels::Mono)
    }

    /// Get reference to the interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.count() as usize
    }

    /// Duration of the signal in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Copy out the frames in `[start, end)` as a new signal
    pub fn slice_frames(&self, start: usize, end: usize) -> SyncResult<AudioSignal> {
        if start > end || end > self.frames() {
            return Err(SyncError::BufferError(format!(
                "Frame range {}..{} out of bounds for {} frames",
                start,
                end,
                self.frames()
            )));
        }

        let width = self.channels.count() as usize;
        AudioSignal::new(
            self.samples[start * width..end * width].to_vec(),
            self.sample_rate,
            self.channels,
        )
    }

    /// Check if signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::from_count(1).unwrap(), Channels::Mono);
        assert_eq!(Channels::from_count(2).unwrap(), Channels::Stereo);
        assert!(Channels::from_count(0).is_err());
        assert!(Channels::from_count(3).is_err());
    }

    #[test]
    fn test_signal_creation() {
        let signal = AudioSignal::new(vec![0.1, 0.2, 0.3, 0.4], 4, Channels::Stereo).unwrap();

        assert_eq!(signal.sample_rate(), 4);
        assert_eq!(signal.channels(), Channels::Stereo);
        assert_eq!(signal.frames(), 2);
        assert!((signal.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_signal_invalid_samples() {
        // Odd number of samples for stereo should fail
        let result = AudioSignal::new(vec![0.1, 0.2, 0.3], 44100, Channels::Stereo);
        assert!(result.is_err());
    }

    #[test]
    fn test_signal_zero_rate() {
        assert!(AudioSignal::mono(vec![0.0], 0).is_err());
    }

    #[test]
    fn test_slice_frames_keeps_interleaving() {
        let signal =
            AudioSignal::new(vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0], 10, Channels::Stereo).unwrap();
        let slice = signal.slice_frames(1, 3).unwrap();
        assert_eq!(slice.samples(), &[2.0, -2.0, 3.0, -3.0]);
        assert!(signal.slice_frames(2, 4).is_err());
    }
}
