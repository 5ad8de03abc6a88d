// Cough Triage Core - segment extraction and feature preparation
// Waveform -> peak-anchored segments -> MFCC tensor -> external classifiers

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod inference;
pub mod pipeline;

// Re-exports for convenience
pub use analysis::{
    extract_segment, find_peaks, normalize_time_axis, DenoiseOutcome, FeatureMatrix,
    MfccExtractor, NormalizedFeatureTensor, Segment, Segmenter,
};
pub use audio::{decode_wav_bytes, decode_wav_file, Waveform};
pub use config::{AppConfig, FeatureConfig, FeatureSource, SegmentationConfig, TensorLayout};
pub use error::{AudioError, ErrorCode, InferenceError};
pub use inference::{Classifier, ModelRegistry, Prediction};
pub use pipeline::{TriagePipeline, TriageReport};
