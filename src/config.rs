//! Configuration management for the triage pipeline
//!
//! This module provides runtime configuration loading from JSON files so
//! segmentation, feature-shaping and ensemble parameters can be matched to
//! whichever classifier is deployed without recompilation. Every field has a
//! documented default; a missing or malformed file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AudioError;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub segmentation: SegmentationConfig,
    pub features: FeatureConfig,
    pub ensemble: EnsembleConfig,
}

/// Peak-based segment extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Peak threshold as a fraction of the loudest absolute sample
    pub threshold_factor: f64,
    /// Minimum spacing between kept peaks, in seconds
    pub min_distance_sec: f64,
    /// Length of each extracted segment, in milliseconds
    pub segment_duration_ms: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold_factor: 0.85,
            min_distance_sec: 1.0,
            segment_duration_ms: 1000,
        }
    }
}

/// Axis order of the classifier tensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// `(1, T, K, 1)`: batch, time, coefficients, channel
    #[default]
    TimeMajor,
    /// `(1, K, T, 1)`: batch, coefficients, time, channel
    CoefficientMajor,
}

/// Which audio the feature extractor consumes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    /// The full input clip (one tensor)
    #[default]
    Original,
    /// Each extracted segment (one tensor per segment)
    Segments,
}

/// Cepstral feature extraction and tensor shaping parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Number of cepstral coefficients kept per frame (K)
    pub num_coefficients: usize,
    /// FFT window size in samples
    pub fft_window_size: usize,
    /// Hop between successive frames in samples
    pub hop_length: usize,
    /// Number of mel bands fed to the DCT
    pub n_mels: usize,
    /// Pad `fft_window_size / 2` zeros on both sides before framing
    pub center: bool,
    /// Fixed time-axis length of the classifier tensor (T)
    pub expected_time_steps: usize,
    pub layout: TensorLayout,
    /// Resample before extraction; `None` keeps the native rate
    pub target_sample_rate: Option<u32>,
    pub source: FeatureSource,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            num_coefficients: 13,
            fft_window_size: 2048,
            hop_length: 512,
            n_mels: 128,
            center: true,
            expected_time_steps: 120,
            layout: TensorLayout::TimeMajor,
            target_sample_rate: None,
            source: FeatureSource::Original,
        }
    }
}

/// Condition under which the secondary classifier is consulted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GatingMode {
    /// Both gate models predict `positive_class` and their class indices
    /// differ by at most `max_difference`.
    ClassIndex {
        positive_class: usize,
        max_difference: usize,
    },
    /// Both gate models predict `positive_class` and their positive-class
    /// percentages differ by at most `max_difference_pct` points.
    Confidence {
        positive_class: usize,
        max_difference_pct: f32,
    },
}

impl Default for GatingMode {
    fn default() -> Self {
        GatingMode::ClassIndex {
            positive_class: 1,
            max_difference: 10,
        }
    }
}

/// Ensemble wiring between registered classifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Models always run, in report order
    pub primary_models: Vec<String>,
    /// Pair of primary models whose agreement opens the gate
    pub gate_models: (String, String),
    /// Model run only when the gate opens
    pub secondary_model: String,
    pub gating: GatingMode,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            primary_models: vec!["P".to_string(), "B".to_string(), "C".to_string()],
            gate_models: ("P".to_string(), "B".to_string()),
            secondary_model: "BP".to_string(),
            gating: GatingMode::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Reject parameter combinations the pipeline cannot honour
    pub fn validate(&self) -> Result<(), AudioError> {
        let seg = &self.segmentation;
        if !(seg.threshold_factor > 0.0 && seg.threshold_factor <= 1.0) {
            return Err(invalid(format!(
                "threshold_factor must be in (0, 1], got {}",
                seg.threshold_factor
            )));
        }
        if !(seg.min_distance_sec >= 0.0 && seg.min_distance_sec.is_finite()) {
            return Err(invalid(format!(
                "min_distance_sec must be >= 0, got {}",
                seg.min_distance_sec
            )));
        }
        if seg.segment_duration_ms == 0 {
            return Err(invalid("segment_duration_ms must be > 0".to_string()));
        }

        let feat = &self.features;
        if feat.fft_window_size == 0 || feat.hop_length == 0 {
            return Err(invalid(
                "fft_window_size and hop_length must be > 0".to_string(),
            ));
        }
        if feat.hop_length > feat.fft_window_size {
            return Err(invalid(format!(
                "hop_length ({}) must not exceed fft_window_size ({})",
                feat.hop_length, feat.fft_window_size
            )));
        }
        if feat.num_coefficients == 0 || feat.num_coefficients > feat.n_mels {
            return Err(invalid(format!(
                "num_coefficients must be in 1..={} (n_mels), got {}",
                feat.n_mels, feat.num_coefficients
            )));
        }
        if feat.expected_time_steps == 0 {
            return Err(invalid("expected_time_steps must be > 0".to_string()));
        }
        if feat.target_sample_rate == Some(0) {
            return Err(invalid("target_sample_rate must be > 0".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> AudioError {
    AudioError::InvalidConfig { reason }
}
