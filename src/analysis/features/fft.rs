// FFT module - short-time power spectrum computation
//
// This module handles framing and FFT computation with a periodic Hann
// window. The power spectrum feeds the mel filterbank.

use ndarray::Array2;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes power spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Periodic Hann window (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (2048 for the default MFCC setup)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Periodic Hann: denominator N, not N - 1
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / fft_size as f32).cos())
            })
            .collect();

        Self {
            fft,
            fft_size,
            window,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute |FFT|^2 of one windowed frame
    ///
    /// # Arguments
    /// * `frame` - Audio frame (length <= fft_size, zero-padded if shorter)
    ///
    /// # Returns
    /// Power spectrum (size = fft_size / 2 + 1)
    pub fn compute_power_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .take(self.fft_size)
            .zip(self.window.iter())
            .map(|(sample, w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.num_bins()]
            .iter()
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Number of frames produced for `len` samples.
    ///
    /// Centered framing pads `fft_size / 2` zeros on both sides. Returns
    /// `None` when not even one frame fits.
    pub fn frame_count(&self, len: usize, hop: usize, center: bool) -> Option<usize> {
        if center && len == 0 {
            return None;
        }
        let padded = if center {
            len + 2 * (self.fft_size / 2)
        } else {
            len
        };
        if padded < self.fft_size {
            return None;
        }
        Some(1 + (padded - self.fft_size) / hop)
    }

    /// Minimum sample count that yields one frame.
    pub fn min_samples(&self, center: bool) -> usize {
        if center {
            1.max(self.fft_size - 2 * (self.fft_size / 2))
        } else {
            self.fft_size
        }
    }

    /// Power spectrogram with shape (bins, frames).
    pub fn power_spectrogram(
        &self,
        samples: &[f32],
        hop: usize,
        center: bool,
    ) -> Option<Array2<f32>> {
        let frames = self.frame_count(samples.len(), hop, center)?;
        let pad = if center { self.fft_size / 2 } else { 0 };

        let mut spectrogram = Array2::<f32>::zeros((self.num_bins(), frames));
        let mut frame = vec![0.0_f32; self.fft_size];

        for t in 0..frames {
            let start = t * hop;
            for (i, slot) in frame.iter_mut().enumerate() {
                // Position in the unpadded signal; outside it reads as zero.
                *slot = (start + i)
                    .checked_sub(pad)
                    .and_then(|idx| samples.get(idx))
                    .copied()
                    .unwrap_or(0.0);
            }
            let power = self.compute_power_spectrum(&frame);
            for (bin, value) in power.into_iter().enumerate() {
                spectrogram[[bin, t]] = value;
            }
        }

        Some(spectrogram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_centered() {
        let fft = FftProcessor::new(2048);
        assert_eq!(fft.frame_count(199 * 512, 512, true), Some(200));
        assert_eq!(fft.frame_count(49 * 512, 512, true), Some(50));
        assert_eq!(fft.frame_count(1, 512, true), Some(1));
        assert_eq!(fft.frame_count(0, 512, true), None);
    }

    #[test]
    fn test_frame_count_uncentered() {
        let fft = FftProcessor::new(2048);
        assert_eq!(fft.frame_count(2047, 512, false), None);
        assert_eq!(fft.frame_count(2048, 512, false), Some(1));
        assert_eq!(fft.frame_count(2048 + 512, 512, false), Some(2));
        assert_eq!(fft.min_samples(false), 2048);
        assert_eq!(fft.min_samples(true), 1);
    }

    #[test]
    fn test_power_spectrum_peak_bin() {
        let size = 1024;
        let sample_rate = 16000.0;
        let fft = FftProcessor::new(size);
        // Bin 64 center frequency = 64 * 16000 / 1024 = 1000 Hz
        let frame: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sample_rate).sin())
            .collect();
        let power = fft.compute_power_spectrum(&frame);
        assert_eq!(power.len(), size / 2 + 1);

        let peak_bin = power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 64);
    }

    #[test]
    fn test_spectrogram_shape() {
        let fft = FftProcessor::new(256);
        let samples = vec![0.1_f32; 1000];
        let spec = fft.power_spectrogram(&samples, 64, true).unwrap();
        assert_eq!(spec.shape(), &[129, 1 + 1000 / 64]);
    }
}
