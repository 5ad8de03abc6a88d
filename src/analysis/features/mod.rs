// MfccExtractor - cepstral feature extraction for cough classification
//
// This module converts a waveform (or one extracted segment) into the
// fixed-shape tensor expected by a fixed-input-size classifier.
//
// Module organization:
// - fft: framing + power spectrum (periodic Hann window)
// - mel: Slaney mel filterbank, power-to-dB
// - dct: orthonormal DCT-II basis
// - types: FeatureMatrix, NormalizedFeatureTensor
// - normalize: time-axis padding/truncation
// - mod.rs: Coordinator (MfccExtractor)
//
// Pipeline per clip:
// 1. Optional linear resample to `target_sample_rate`
// 2. Centered STFT power spectrogram (n_fft / hop)
// 3. Mel projection (n_mels bands) -> dB (ref 1.0, top_db 80)
// 4. DCT-II (ortho) over the mel axis, keep first K coefficients
//
// Defaults match the common librosa MFCC setup (13 coefficients, 2048-point
// window, 512 hop, 128 mels), so tensors line up with models trained on it.

mod dct;
mod fft;
mod mel;
mod normalize;
mod types;

pub use mel::{hz_to_mel, mel_filterbank, mel_to_hz};
pub use normalize::normalize_time_axis;
pub use types::{FeatureMatrix, NormalizedFeatureTensor};

use std::borrow::Cow;

use crate::audio::Waveform;
use crate::config::FeatureConfig;
use crate::error::AudioError;
use dct::dct_basis;
use fft::FftProcessor;
use ndarray::Array2;

/// MfccExtractor coordinates spectral analysis, mel projection and DCT
///
/// Holds the FFT plan and DCT basis; the mel filterbank depends on the
/// waveform's sample rate and is built per call.
pub struct MfccExtractor {
    config: FeatureConfig,
    fft_processor: FftProcessor,
    dct: Array2<f32>,
}

impl MfccExtractor {
    /// Create an extractor for a validated feature configuration
    pub fn new(config: FeatureConfig) -> Self {
        let fft_processor = FftProcessor::new(config.fft_window_size);
        let dct = dct_basis(config.num_coefficients, config.n_mels);
        Self {
            config,
            fft_processor,
            dct,
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute the (K x frames) cepstral matrix of a waveform
    ///
    /// # Errors
    /// `AudioError::InsufficientAudio` when the waveform cannot fill a
    /// single analysis frame (empty when centered, shorter than the FFT
    /// window when not)
    pub fn extract_features(&self, waveform: &Waveform) -> Result<FeatureMatrix, AudioError> {
        let waveform = self.prepare(waveform)?;
        let samples = waveform.samples();

        let power = self
            .fft_processor
            .power_spectrogram(samples, self.config.hop_length, self.config.center)
            .ok_or(AudioError::InsufficientAudio {
                samples: samples.len(),
                required: self.fft_processor.min_samples(self.config.center),
            })?;

        let filterbank = mel_filterbank(
            waveform.sample_rate(),
            self.config.fft_window_size,
            self.config.n_mels,
        );
        let mut mel_spec = filterbank.dot(&power);
        mel::power_to_db(&mut mel_spec);

        let mfcc = self.dct.dot(&mel_spec);
        log::debug!(
            "[MfccExtractor] {} samples @ {} Hz -> mfcc {:?}",
            samples.len(),
            waveform.sample_rate(),
            mfcc.shape()
        );
        Ok(FeatureMatrix::new(mfcc))
    }

    /// Extract features and normalize to the configured tensor shape
    pub fn extract_tensor(
        &self,
        waveform: &Waveform,
    ) -> Result<NormalizedFeatureTensor, AudioError> {
        let matrix = self.extract_features(waveform)?;
        Ok(normalize_time_axis(
            &matrix,
            self.config.expected_time_steps,
            self.config.layout,
        ))
    }

    /// Shape every tensor from this extractor will have
    pub fn tensor_shape(&self) -> [usize; 4] {
        let (t, k) = (self.config.expected_time_steps, self.config.num_coefficients);
        match self.config.layout {
            crate::config::TensorLayout::TimeMajor => [1, t, k, 1],
            crate::config::TensorLayout::CoefficientMajor => [1, k, t, 1],
        }
    }

    fn prepare<'a>(&self, waveform: &'a Waveform) -> Result<Cow<'a, Waveform>, AudioError> {
        match self.config.target_sample_rate {
            Some(rate) if rate != waveform.sample_rate() => {
                Ok(Cow::Owned(waveform.resample_linear(rate)?))
            }
            _ => Ok(Cow::Borrowed(waveform)),
        }
    }
}

impl Default for MfccExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
