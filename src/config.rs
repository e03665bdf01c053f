use crate::error::{SyncError, SyncResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// How the signal is cut into recognition windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationStrategy {
    /// Fixed-length windows advanced by a hop
    Fixed,
    /// Cuts placed on detected note/word onsets
    Onset,
}

/// Edit costs and matching leniency for the lyric aligner.
///
/// Costs are integers so equal-cost paths compare exactly; the tie-break
/// rules in the aligner depend on that.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Cost of pairing a lyric word with a differently-spelled recognized word
    pub substitution_cost: u32,
    /// Cost of leaving a lyric word without a recognized counterpart
    pub reference_skip_cost: u32,
    /// Cost of discarding a recognized word that is not in the lyric
    pub recognized_skip_cost: u32,
    /// Minimum normalized edit similarity for two words to count as a match
    pub near_match_threshold: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            substitution_cost: 3,
            reference_skip_cost: 2,
            recognized_skip_cost: 2,
            near_match_threshold: 0.8,
        }
    }
}

impl AlignConfig {
    /// Check the cost ordering the aligner relies on
    pub fn validate(&self) -> SyncResult<()> {
        if self.substitution_cost == 0 {
            return Err(SyncError::ConfigError(
                "substitution_cost must be greater than zero".to_string(),
            ));
        }
        if self.substitution_cost >= self.reference_skip_cost + self.recognized_skip_cost {
            return Err(SyncError::ConfigError(format!(
                "substitution_cost ({}) must be lower than a reference skip plus a recognized skip ({})",
                self.substitution_cost,
                self.reference_skip_cost + self.recognized_skip_cost
            )));
        }
        if !(0.0..=1.0).contains(&self.near_match_threshold) {
            return Err(SyncError::ConfigError(format!(
                "near_match_threshold must be within [0, 1], got {}",
                self.near_match_threshold
            )));
        }
        Ok(())
    }
}

/// Settings for one synchronization run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sample rate every recognizer receives
    pub target_sample_rate: u32,
    /// Segmentation strategy
    pub segmentation: SegmentationStrategy,
    /// Window length in seconds
    pub window_secs: f64,
    /// Hop between window starts in seconds (fixed strategy)
    pub hop_secs: f64,
    /// Shortest segment the onset strategy will cut, in seconds
    pub min_segment_secs: f64,
    /// Parallel recognition workers
    pub workers: usize,
    /// Per-segment recognition deadline in seconds, `None` waits forever
    pub recognition_timeout_secs: Option<f64>,
    /// Aligner settings
    pub align: AlignConfig,
}

impl SyncConfig {
    /// Sample rate most speech models expect
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;
    /// Default window and hop length
    pub const DEFAULT_WINDOW_SECS: f64 = 15.0;

    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: SyncConfig = serde_json::from_str(&data)
            .map_err(|e| SyncError::ConfigError(format!("parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> SyncResult<()> {
        if self.target_sample_rate == 0 {
            return Err(SyncError::InvalidSampleRate { rate: 0 });
        }
        self.window()?;
        self.hop()?;
        self.min_segment()?;
        self.recognition_timeout()?;
        if !(self.window_secs > 0.0) || !(self.hop_secs > 0.0) {
            return Err(SyncError::ConfigError(
                "window and hop must be greater than zero".to_string(),
            ));
        }
        if self.hop_secs > self.window_secs {
            return Err(SyncError::ConfigError(format!(
                "hop ({}s) must not exceed window ({}s)",
                self.hop_secs, self.window_secs
            )));
        }
        if self.min_segment_secs < 0.0 || self.min_segment_secs > self.window_secs {
            return Err(SyncError::ConfigError(format!(
                "min_segment_secs must be within [0, {}]",
                self.window_secs
            )));
        }
        if self.workers == 0 {
            return Err(SyncError::ConfigError(
                "workers must be at least 1".to_string(),
            ));
        }
        if let Some(timeout) = self.recognition_timeout_secs {
            if !(timeout > 0.0) {
                return Err(SyncError::ConfigError(
                    "recognition_timeout_secs must be positive".to_string(),
                ));
            }
        }
        self.align.validate()
    }

    /// Window length as a `Duration`
    pub fn window(&self) -> SyncResult<Duration> {
        to_duration("window_secs", self.window_secs)
    }

    /// Hop as a `Duration`
    pub fn hop(&self) -> SyncResult<Duration> {
        to_duration("hop_secs", self.hop_secs)
    }

    /// Shortest onset segment as a `Duration`
    pub fn min_segment(&self) -> SyncResult<Duration> {
        to_duration("min_segment_secs", self.min_segment_secs)
    }

    /// Recognition deadline as a `Duration`
    pub fn recognition_timeout(&self) -> SyncResult<Option<Duration>> {
        self.recognition_timeout_secs
            .map(|secs| to_duration("recognition_timeout_secs", secs))
            .transpose()
    }
}

/// Seconds to `Duration`; negative, non-finite and overflowing values are
/// config errors
fn to_duration(field: &str, secs: f64) -> SyncResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| SyncError::ConfigError(format!("{} = {}: {}", field, secs, e)))
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: Self::DEFAULT_SAMPLE_RATE_HZ,
            segmentation: SegmentationStrategy::Fixed,
            window_secs: Self::DEFAULT_WINDOW_SECS,
            hop_secs: Self::DEFAULT_WINDOW_SECS,
            min_segment_secs: 2.0,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            recognition_timeout_secs: Some(120.0),
            align: AlignConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn sync_config_default_is_valid() {
        let config = SyncConfig::default();
        assert_eq!(config.target_sample_rate, 16_000);
        assert_eq!(config.window_secs, 15.0);
        assert_eq!(config.hop_secs, config.window_secs);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn hop_longer_than_window_is_rejected() {
        let config = SyncConfig {
            hop_secs: 20.0,
            ..SyncConfig::default()
        };
        assert!(matches!(config.validate(), Err(SyncError::ConfigError(_))));
    }

    #[test]
    fn substitution_must_be_cheaper_than_two_skips() {
        let align = AlignConfig {
            substitution_cost: 4,
            ..AlignConfig::default()
        };
        assert!(align.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "window_secs": 10.0, "hop_secs": 8.0, "segmentation": "onset",
                 "recognition_timeout_secs": null, "align": {{ "substitution_cost": 2 }} }}"#
        )
        .unwrap();

        let config = SyncConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.window_secs, 10.0);
        assert_eq!(config.hop_secs, 8.0);
        assert_eq!(config.segmentation, SegmentationStrategy::Onset);
        assert_eq!(config.recognition_timeout().unwrap(), None);
        assert_eq!(config.align.substitution_cost, 2);
        assert_eq!(config.align.reference_skip_cost, 2);
        assert_eq!(config.target_sample_rate, 16_000);
    }

    #[test]
    fn out_of_range_durations_are_config_errors() {
        let timeout = SyncConfig {
            recognition_timeout_secs: Some(1e20),
            ..SyncConfig::default()
        };
        assert!(matches!(timeout.validate(), Err(SyncError::ConfigError(_))));
        assert!(matches!(
            timeout.recognition_timeout(),
            Err(SyncError::ConfigError(_))
        ));

        let window = SyncConfig {
            window_secs: 1e20,
            hop_secs: 1e20,
            ..SyncConfig::default()
        };
        assert!(matches!(window.validate(), Err(SyncError::ConfigError(_))));

        let nan = SyncConfig {
            min_segment_secs: f64::NAN,
            ..SyncConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn huge_timeout_in_json_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "recognition_timeout_secs": 1e20 }}"#).unwrap();
        assert!(matches!(
            SyncConfig::from_json_file(file.path()),
            Err(SyncError::ConfigError(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            SyncConfig::from_json_file(file.path()),
            Err(SyncError::ConfigError(_))
        ));
    }
}
