use crate::core::AudioSignal;
use crate::error::{SyncError, SyncResult};
use log::debug;
use rubato::{FftFixedIn, Resampler};

/// Input frames fed to the FFT resampler per call
const CHUNK_FRAMES: usize = 1024;

/// Audio resampler backed by rubato's synchronous FFT resampler
pub struct Resample {
    output_rate: u32,
}

impl Resample {
    /// Create a resampler targeting `output_rate` Hz
    pub fn new(output_rate: u32) -> SyncResult<Self> {
        if output_rate == 0 {
            return Err(SyncError::InvalidSampleRate { rate: 0 });
        }

        Ok(Resample { output_rate })
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    fn deinterleave(samples: &[f32], width: usize) -> Vec<Vec<f32>> {
        (0..width)
            .map(|ch| samples.iter().skip(ch).step_by(width).copied().collect())
            .collect()
    }

    fn interleave(planar: &[Vec<f32>], frames: usize) -> Vec<f32> {
        let mut samples = Vec::with_capacity(frames * planar.len());
        for i in 0..frames {
            for channel in planar {
                samples.push(channel[i]);
            }
        }
        samples
    }

    fn append(out: &mut [Vec<f32>], chunk: Vec<Vec<f32>>) {
        for (dst, src) in out.iter_mut().zip(chunk) {
            dst.extend(src);
        }
    }

    fn resample_planar(
        planar: &[Vec<f32>],
        input_rate: u32,
        output_rate: u32,
    ) -> SyncResult<Vec<Vec<f32>>> {
        let width = planar.len();
        let frames = planar.first().map(|c| c.len()).unwrap_or(0);
        let expected =
            (frames as f64 * output_rate as f64 / input_rate as f64).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_FRAMES,
            2,
            width,
        )
        .map_err(|e| SyncError::ResamplingError(e.to_string()))?;

        let delay = resampler.output_delay();
        let mut out = vec![Vec::with_capacity(expected + delay); width];

        let mut pos = 0;
        while frames - pos >= resampler.input_frames_next() {
            let n = resampler.input_frames_next();
            let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + n]).collect();
            let res = resampler
                .process(&chunk, None)
                .map_err(|e| SyncError::ResamplingError(e.to_string()))?;
            Self::append(&mut out, res);
            pos += n;
        }

        if pos < frames {
            let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
            let res = resampler
                .process_partial(Some(chunk.as_slice()), None)
                .map_err(|e| SyncError::ResamplingError(e.to_string()))?;
            Self::append(&mut out, res);
        }

        // Drain the filter delay
        while out[0].len() < expected + delay {
            let res = resampler
                .process_partial::<Vec<f32>>(None, None)
                .map_err(|e| SyncError::ResamplingError(e.to_string()))?;
            if res.first().map(|c| c.is_empty()).unwrap_or(true) {
                break;
            }
            Self::append(&mut out, res);
        }

        Ok(out
            .into_iter()
            .map(|mut channel| {
                let end = (delay + expected).min(channel.len());
                let start = delay.min(end);
                channel.truncate(end);
                channel.drain(..start);
                channel.resize(expected, 0.0);
                channel
            })
            .collect())
    }
}

impl super::Filter for Resample {
    fn process(&mut self, signal: &AudioSignal) -> SyncResult<AudioSignal> {
        if signal.sample_rate() == self.output_rate {
            return Ok(signal.clone());
        }

        if signal.is_empty() {
            return AudioSignal::new(Vec::new(), self.output_rate, signal.channels());
        }

        debug!(
            "Resampling {} frames {} Hz -> {} Hz",
            signal.frames(),
            signal.sample_rate(),
            self.output_rate
        );

        let width = signal.channels().count() as usize;
        let planar = Self::deinterleave(signal.samples(), width);
        let resampled = Self::resample_planar(&planar, signal.sample_rate(), self.output_rate)?;
        let frames = resampled.first().map(|c| c.len()).unwrap_or(0);

        AudioSignal::new(
            Self::interleave(&resampled, frames),
            self.output_rate,
            signal.channels(),
        )
    }
}
