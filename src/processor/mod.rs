//! Audio segmentation for per-window recognition

pub mod onset;
pub mod segment;

pub use onset::OnsetSegmenter;
pub use segment::{FixedWindowSegmenter, Segment};

use crate::config::{SegmentationStrategy, SyncConfig};
use crate::core::AudioSignal;
use crate::error::SyncResult;

/// Trait for strategies that split a signal into recognition windows.
///
/// Implementations must return segments ordered by `global_offset`, cover the
/// whole signal without gaps, and never emit a zero-length segment. An empty
/// signal yields no segments.
pub trait Segmenter: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &str;

    /// Split the signal into segments
    fn segment(&self, signal: &AudioSignal) -> SyncResult<Vec<Segment>>;
}

/// Build the segmenter selected by `config`
pub fn from_config(config: &SyncConfig) -> SyncResult<Box<dyn Segmenter>> {
    let window = config.window()?;
    Ok(match config.segmentation {
        SegmentationStrategy::Fixed => Box::new(FixedWindowSegmenter::new(window, config.hop()?)?),
        SegmentationStrategy::Onset => {
            Box::new(OnsetSegmenter::new(window, config.min_segment()?)?)
        }
    })
}
