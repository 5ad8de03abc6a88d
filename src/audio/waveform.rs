//! Immutable mono waveform shared by the segmenter and feature extractor.
//!
//! Every transform (downmix, resample, segment extraction) produces a new
//! value; nothing in the pipeline mutates a `Waveform` in place.

use crate::error::AudioError;

/// Mono amplitude samples plus their sample rate in Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap mono samples, rejecting a zero sample rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidWaveform {
                reason: "sample rate must be > 0".to_string(),
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a mono waveform from interleaved multichannel samples.
    ///
    /// Each frame is averaged across channels. A trailing partial frame is
    /// averaged over the channels it actually contains.
    pub fn from_interleaved(
        interleaved: &[f32],
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::InvalidWaveform {
                reason: "channel count must be > 0".to_string(),
            });
        }
        if channels == 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }

        let mono = interleaved
            .chunks(channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
        Self::new(mono, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute amplitude, or 0.0 for an empty waveform.
    pub fn peak_amplitude(&self) -> f32 {
        self.samples
            .iter()
            .fold(0.0_f32, |acc, &sample| acc.max(sample.abs()))
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Resample to `target_rate` using linear interpolation between
    /// neighbouring source samples.
    ///
    /// Output length is `round(len * target_rate / sample_rate)`.
    pub fn resample_linear(&self, target_rate: u32) -> Result<Self, AudioError> {
        if target_rate == 0 {
            return Err(AudioError::InvalidWaveform {
                reason: "target sample rate must be > 0".to_string(),
            });
        }
        if target_rate == self.sample_rate || self.samples.is_empty() {
            return Self::new(self.samples.clone(), target_rate);
        }

        let ratio = self.sample_rate as f64 / target_rate as f64;
        let out_len =
            ((self.samples.len() as f64) * target_rate as f64 / self.sample_rate as f64).round()
                as usize;
        let last = self.samples.len() - 1;

        let resampled = (0..out_len)
            .map(|i| {
                let cursor = i as f64 * ratio;
                let idx = (cursor.floor() as usize).min(last);
                let next_idx = (idx + 1).min(last);
                let frac = (cursor - idx as f64) as f32;
                if next_idx == idx {
                    self.samples[idx]
                } else {
                    (1.0 - frac) * self.samples[idx] + frac * self.samples[next_idx]
                }
            })
            .collect();

        log::debug!(
            "[Waveform] Resampled {} Hz -> {} Hz ({} -> {} samples)",
            self.sample_rate,
            target_rate,
            self.samples.len(),
            out_len
        );
        Self::new(resampled, target_rate)
    }
}
