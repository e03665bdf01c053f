use crate::core::{AudioSignal, Channels};
use crate::error::{SyncError, SyncResult};
use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    /// Current reader for the audio source
    reader: Box<dyn FormatReader>,
    /// Track being decoded
    track_id: u32,
    /// Sample rate
    sample_rate: u32,
    /// Number of channels
    channels: Channels,
    /// Packets decoded so far
    packet_count: u64,
    /// Whether decoding is finished
    finished: bool,
    /// Codec state
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
}

impl SymphoniaDecoder {
    /// Create decoder from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let path = path.as_ref();

        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        // The extension is only a hint; probing still sniffs the content
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| SyncError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| SyncError::UnsupportedFormat("No audio track found".to_string()))?
            .clone();

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| SyncError::DecodeError("Unknown sample rate".to_string()))?;

        let channels = match codec_params.channels {
            Some(channels) => Channels::from_count(channels.count() as u32)?,
            None => return Err(SyncError::DecodeError("Unknown channel count".to_string())),
        };

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| SyncError::DecodeError(e.to_string()))?;

        debug!(
            "Opened {:?}: {} Hz, {}",
            path,
            sample_rate,
            channels.name()
        );

        Ok(SymphoniaDecoder {
            reader,
            track_id,
            sample_rate,
            channels,
            packet_count: 0,
            finished: false,
            decoder,
        })
    }

    /// Get sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get channels
    pub fn channels(&self) -> Channels {
        self.channels
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn decode_chunk(&mut self) -> SyncResult<Option<AudioSignal>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let audio_buf = match self.decoder.decode(&packet) {
                Ok(audio_buf) => audio_buf,
                Err(SymphoniaError::DecodeError(reason)) => {
                    warn!("Skipping corrupt packet {}: {}", self.packet_count, reason);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *audio_buf.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(audio_buf);

            self.packet_count += 1;

            if sample_buf.samples().is_empty() {
                continue;
            }

            let chunk =
                AudioSignal::new(sample_buf.samples().to_vec(), self.sample_rate, self.channels)?;

            return Ok(Some(chunk));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaDecoder::from_file("/nonexistent/file.mp3");
        assert!(matches!(result, Err(SyncError::Io(_))));
    }
}
