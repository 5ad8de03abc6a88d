// Analysis module - segment extraction and feature preparation
//
// Architecture:
// - Segmenter: peak detection -> greedy distance suppression -> fixed windows
// - SegmentWriter: optional best-effort `segment_<n>.wav` persistence
// - MfccExtractor: cepstral matrix -> fixed-shape classifier tensor

pub mod features;
pub mod persist;
pub mod segmenter;

pub use features::{normalize_time_axis, FeatureMatrix, MfccExtractor, NormalizedFeatureTensor};
pub use persist::SegmentWriter;
pub use segmenter::{
    extract_segment, find_peaks, segment_length, DenoiseOutcome, Segment, Segmenter,
};
