//! End-to-end triage pipeline: segment, extract features, optionally classify.
//!
//! Each `process` call is independent and holds no state between calls, so
//! separate waveforms may be processed on separate threads by the host.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{DenoiseOutcome, MfccExtractor, NormalizedFeatureTensor, Segmenter};
use crate::audio::Waveform;
use crate::config::{AppConfig, FeatureSource};
use crate::error::{AudioError, ErrorCode, InferenceError};
use crate::inference::{run_ensemble, EnsembleReport, ModelRegistry};

/// Everything produced for one input clip
#[derive(Debug, Clone)]
pub struct TriageReport {
    pub denoise: DenoiseOutcome,
    pub source: FeatureSource,
    /// One tensor for `Original`, one per segment for `Segments`
    pub tensors: Vec<NormalizedFeatureTensor>,
    pub input_samples: usize,
    pub input_sample_rate: u32,
}

impl TriageReport {
    /// Serializable view (tensor values omitted unless requested)
    pub fn summary(&self, include_values: bool) -> TriageSummary {
        TriageSummary {
            input_samples: self.input_samples,
            input_sample_rate: self.input_sample_rate,
            threshold: self.denoise.threshold,
            min_distance: self.denoise.min_distance,
            segments: self
                .denoise
                .segments
                .iter()
                .map(|segment| SegmentSummary {
                    index: segment.index,
                    peak_index: segment.peak_index,
                    peak_time_secs: segment.peak_time_secs(),
                    length: segment.samples.len(),
                })
                .collect(),
            persisted: self.denoise.persisted.clone(),
            write_errors: self
                .denoise
                .write_errors
                .iter()
                .map(|err| WriteErrorSummary {
                    code: err.code(),
                    message: err.message(),
                })
                .collect(),
            source: self.source,
            tensors: self
                .tensors
                .iter()
                .map(|tensor| TensorSummary {
                    shape: tensor.shape(),
                    values: include_values.then(|| tensor.to_vec()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TriageSummary {
    pub input_samples: usize,
    pub input_sample_rate: u32,
    pub threshold: f32,
    pub min_distance: usize,
    pub segments: Vec<SegmentSummary>,
    pub persisted: Vec<PathBuf>,
    pub write_errors: Vec<WriteErrorSummary>,
    pub source: FeatureSource,
    pub tensors: Vec<TensorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentSummary {
    pub index: usize,
    pub peak_index: usize,
    pub peak_time_secs: f32,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteErrorSummary {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TensorSummary {
    pub shape: [usize; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
}

/// Segmenter + feature extractor wired from one `AppConfig`
pub struct TriagePipeline {
    config: AppConfig,
    segmenter: Segmenter,
    extractor: MfccExtractor,
}

impl TriagePipeline {
    /// Validate the configuration and build the pipeline stages
    pub fn new(config: AppConfig) -> Result<Self, AudioError> {
        config.validate()?;
        Ok(Self {
            segmenter: Segmenter::new(config.segmentation.clone()),
            extractor: MfccExtractor::new(config.features.clone()),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn extractor(&self) -> &MfccExtractor {
        &self.extractor
    }

    /// Segment the clip (persisting segments when `output_dir` is given) and
    /// build classifier tensors from the configured feature source.
    ///
    /// With `FeatureSource::Segments` and no detected peaks the tensor list
    /// is empty; that is a valid outcome.
    pub fn process(
        &self,
        waveform: &Waveform,
        output_dir: Option<&Path>,
    ) -> Result<TriageReport, AudioError> {
        let denoise = self.segmenter.denoise(waveform, output_dir);

        let tensors = match self.config.features.source {
            FeatureSource::Original => vec![self.extractor.extract_tensor(waveform)?],
            FeatureSource::Segments => denoise
                .segments
                .iter()
                .map(|segment| self.extractor.extract_tensor(&segment.to_waveform()?))
                .collect::<Result<Vec<_>, _>>()?,
        };

        log::info!(
            "[Pipeline] {} segment(s), {} tensor(s) of shape {:?}",
            denoise.segments.len(),
            tensors.len(),
            self.extractor.tensor_shape()
        );

        Ok(TriageReport {
            denoise,
            source: self.config.features.source,
            tensors,
            input_samples: waveform.len(),
            input_sample_rate: waveform.sample_rate(),
        })
    }

    /// Run the configured ensemble on every tensor of a report
    pub fn classify(
        &self,
        registry: &ModelRegistry,
        report: &TriageReport,
    ) -> Result<Vec<EnsembleReport>, InferenceError> {
        report
            .tensors
            .iter()
            .map(|tensor| run_ensemble(registry, &self.config.ensemble, tensor))
            .collect()
    }
}
