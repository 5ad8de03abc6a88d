// Segmenter - peak-anchored extraction of fixed-length sound events
//
// Isolates salient events (individual coughs) from a clip recorded in an
// uncontrolled environment.
//
// Algorithm:
// 1. threshold = threshold_factor * max(|x|)   (relative to the loudest sample)
// 2. Candidates: every index with |x[i]| > threshold, ascending
// 3. Greedy suppression: keep a candidate when it lies at least
//    min_distance samples after the last *kept* peak. This keeps the first
//    threshold crossing of a cluster, not its local maximum.
// 4. Window [peak - L/2, peak + L/2) clamped to the signal, then zero-filled
//    at the end up to exactly L samples.

use std::path::{Path, PathBuf};

use crate::analysis::persist::SegmentWriter;
use crate::audio::Waveform;
use crate::config::SegmentationConfig;
use crate::error::AudioError;

/// Fixed-length window around a detected peak.
///
/// Owns its samples; independent of the source waveform after extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// 1-based position in detection order (matches `segment_<index>.wav`)
    pub index: usize,
    /// Peak sample index in the source waveform
    pub peak_index: usize,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Segment {
    pub fn to_waveform(&self) -> Result<Waveform, AudioError> {
        Waveform::new(self.samples.clone(), self.sample_rate)
    }

    /// Peak position in seconds from the start of the source clip
    pub fn peak_time_secs(&self) -> f32 {
        self.peak_index as f32 / self.sample_rate as f32
    }
}

/// Result of a `denoise` run.
#[derive(Debug, Clone)]
pub struct DenoiseOutcome {
    pub segments: Vec<Segment>,
    pub sample_rate: u32,
    /// Absolute amplitude threshold that was applied
    pub threshold: f32,
    /// Suppression distance in samples
    pub min_distance: usize,
    /// Files written when an output directory was supplied
    pub persisted: Vec<PathBuf>,
    /// Persistence failures; segments above remain valid regardless
    pub write_errors: Vec<AudioError>,
}

impl DenoiseOutcome {
    pub fn peaks(&self) -> Vec<usize> {
        self.segments.iter().map(|segment| segment.peak_index).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Find threshold-exceeding sample indices, greedily thinned by distance.
///
/// # Arguments
/// * `samples` - Waveform samples
/// * `threshold` - Absolute amplitude that a sample must strictly exceed
/// * `min_distance` - Minimum index gap to the previously kept peak
///
/// # Returns
/// Kept peak indices in ascending order
pub fn find_peaks(samples: &[f32], threshold: f32, min_distance: usize) -> Vec<usize> {
    let mut peaks = Vec::new();
    let mut last_kept: Option<usize> = None;

    for (index, sample) in samples.iter().enumerate() {
        if sample.is_nan() || sample.abs() <= threshold {
            continue;
        }
        let far_enough = last_kept.map_or(true, |last| index - last >= min_distance);
        if far_enough {
            peaks.push(index);
            last_kept = Some(index);
        }
    }

    peaks
}

/// Segment length in samples: round(duration_ms * sample_rate / 1000).
pub fn segment_length(sample_rate: u32, segment_duration_ms: u32) -> usize {
    (segment_duration_ms as f64 * sample_rate as f64 / 1000.0).round() as usize
}

/// Copy a window centered on `peak_index`, zero-filled at the end to the
/// exact segment length.
///
/// The window spans `[peak - half, peak + half)` with `half = len / 2`,
/// clamped to the signal. Odd lengths therefore always carry at least one
/// trailing zero.
pub fn extract_segment(
    samples: &[f32],
    sample_rate: u32,
    peak_index: usize,
    segment_duration_ms: u32,
) -> Vec<f32> {
    let length = segment_length(sample_rate, segment_duration_ms);
    let half = length / 2;

    let start = peak_index.saturating_sub(half).min(samples.len());
    let end = peak_index.saturating_add(half).min(samples.len()).max(start);

    let mut segment = Vec::with_capacity(length);
    segment.extend_from_slice(&samples[start..end]);
    segment.resize(length, 0.0);
    segment
}

/// Segmenter applies peak detection and segment extraction with a fixed
/// configuration.
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Extract one segment per surviving peak, optionally writing each to
    /// `output_dir/segment_<n>.wav`.
    ///
    /// A clip with no sample above the threshold (including an empty or
    /// all-zero clip) yields zero segments. Persistence is best effort: write
    /// failures are logged and collected in `write_errors`.
    pub fn denoise(&self, waveform: &Waveform, output_dir: Option<&Path>) -> DenoiseOutcome {
        let sample_rate = waveform.sample_rate();
        let peak = f64::from(waveform.peak_amplitude());
        let threshold = (self.config.threshold_factor * peak) as f32;
        let min_distance = (self.config.min_distance_sec * f64::from(sample_rate)).floor() as usize;

        let peaks = find_peaks(waveform.samples(), threshold, min_distance);
        log::debug!(
            "[Segmenter] threshold={:.4} min_distance={} peaks={:?}",
            threshold,
            min_distance,
            peaks
        );

        let segments: Vec<Segment> = peaks
            .iter()
            .enumerate()
            .map(|(i, &peak_index)| Segment {
                index: i + 1,
                peak_index,
                samples: extract_segment(
                    waveform.samples(),
                    sample_rate,
                    peak_index,
                    self.config.segment_duration_ms,
                ),
                sample_rate,
            })
            .collect();

        let (persisted, write_errors) = match output_dir {
            Some(dir) => SegmentWriter::new(dir).write_all(&segments),
            None => (Vec::new(), Vec::new()),
        };

        log::info!(
            "[Segmenter] Extracted {} segment(s) of {} ms from {:.2}s clip",
            segments.len(),
            self.config.segment_duration_ms,
            waveform.duration_secs()
        );

        DenoiseOutcome {
            segments,
            sample_rate,
            threshold,
            min_distance,
            persisted,
            write_errors,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_peaks_strictly_greater_than_threshold() {
        let samples = [0.5, 0.6, -0.7, 0.6];
        assert_eq!(find_peaks(&samples, 0.6, 0), vec![2]);
    }

    #[test]
    fn test_find_peaks_greedy_leftmost() {
        // The cluster's true maximum is at index 3, but the first crossing wins.
        let samples = [0.0, 0.8, 0.9, 1.0, 0.9, 0.0, 0.0, 0.0, 0.85, 0.0];
        assert_eq!(find_peaks(&samples, 0.7, 5), vec![1, 8]);
    }

    #[test]
    fn test_find_peaks_distance_measured_from_last_kept() {
        // 0 kept, 2 suppressed (gap 2), 3 kept (gap 3 from 0), 5 suppressed.
        let samples = [1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        assert_eq!(find_peaks(&samples, 0.5, 3), vec![0, 3]);
    }

    #[test]
    fn test_find_peaks_zero_distance_keeps_all_candidates() {
        let samples = [1.0, 1.0, 0.0, 1.0];
        assert_eq!(find_peaks(&samples, 0.5, 0), vec![0, 1, 3]);
    }

    #[test]
    fn test_find_peaks_skips_nan_samples() {
        let samples = [0.1, f32::NAN, 0.9, 0.0];
        assert_eq!(find_peaks(&samples, 0.5, 1), vec![2]);
    }

    #[test]
    fn test_find_peaks_empty_and_silent() {
        assert!(find_peaks(&[], 0.0, 10).is_empty());
        assert!(find_peaks(&[0.0; 100], 0.0, 10).is_empty());
    }

    #[test]
    fn test_segment_length_rounds() {
        assert_eq!(segment_length(44100, 1000), 44100);
        assert_eq!(segment_length(22050, 1), 22); // 22.05
        assert_eq!(segment_length(8000, 125), 1000);
        assert_eq!(segment_length(44100, 15), 662); // 661.5 rounds half away from zero
    }

    #[test]
    fn test_extract_segment_interior_window() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        // 10 ms at 1 kHz = 10 samples, half = 5
        let segment = extract_segment(&samples, 1000, 50, 10);
        assert_eq!(segment, (45..55).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_extract_segment_left_clamp_pads_at_end() {
        let samples: Vec<f32> = (1..=100).map(|i| i as f32).collect();
        let segment = extract_segment(&samples, 1000, 2, 10);
        assert_eq!(segment.len(), 10);
        assert_eq!(&segment[..7], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!(segment[7..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_extract_segment_right_clamp_pads_at_end() {
        let samples: Vec<f32> = (1..=20).map(|i| i as f32).collect();
        let segment = extract_segment(&samples, 1000, 18, 10);
        assert_eq!(segment.len(), 10);
        assert_eq!(&segment[..7], &[14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0]);
        assert!(segment[7..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_extract_segment_odd_length_has_trailing_zero() {
        let samples = vec![1.0; 100];
        // 11 samples: half = 5, window covers 10 samples
        let segment = extract_segment(&samples, 1000, 50, 11);
        assert_eq!(segment.len(), 11);
        assert!(segment[..10].iter().all(|&s| s == 1.0));
        assert_eq!(segment[10], 0.0);
    }

    #[test]
    fn test_extract_segment_longer_than_signal() {
        let samples = vec![0.5; 10];
        let segment = extract_segment(&samples, 1000, 5, 100);
        assert_eq!(segment.len(), 100);
        assert_eq!(segment.iter().filter(|&&s| s == 0.5).count(), 10);
    }

    #[test]
    fn test_denoise_constant_clip_scenario() {
        // 5 s at 44.1 kHz, every sample 0.9: threshold 0.765, peaks each second.
        let wave = Waveform::new(vec![0.9; 5 * 44100], 44100).unwrap();
        let outcome = Segmenter::default().denoise(&wave, None);

        assert!((outcome.threshold - 0.765).abs() < 1e-5);
        assert_eq!(outcome.min_distance, 44100);
        assert_eq!(outcome.peaks(), vec![0, 44100, 88200, 132300, 176400]);
        assert_eq!(outcome.segments.len(), 5);
        for (i, segment) in outcome.segments.iter().enumerate() {
            assert_eq!(segment.index, i + 1);
            assert_eq!(segment.samples.len(), 44100);
            assert_eq!(segment.sample_rate, 44100);
        }
        // First peak is clamped on the left: 22050 real samples then zeros.
        assert_eq!(outcome.segments[0].samples[22049], 0.9);
        assert_eq!(outcome.segments[0].samples[22050], 0.0);
        assert!(outcome.persisted.is_empty());
        assert!(outcome.write_errors.is_empty());
    }

    #[test]
    fn test_denoise_min_distance_floors_exact_product() {
        // 0.7 s at 10 kHz is 7000 samples, not 6999.
        let segmenter = Segmenter::new(SegmentationConfig {
            min_distance_sec: 0.7,
            ..SegmentationConfig::default()
        });
        let wave = Waveform::new(vec![0.9; 30000], 10000).unwrap();
        let outcome = segmenter.denoise(&wave, None);

        assert_eq!(outcome.min_distance, 7000);
        assert_eq!(outcome.peaks(), vec![0, 7000, 14000, 21000, 28000]);
    }

    #[test]
    fn test_denoise_nan_sample_is_not_a_peak() {
        let mut samples = vec![0.0; 8000];
        samples[100] = f32::NAN;
        samples[4000] = 0.9;
        let wave = Waveform::new(samples, 8000).unwrap();

        let outcome = Segmenter::default().denoise(&wave, None);
        assert_eq!(outcome.peaks(), vec![4000]);
    }

    #[test]
    fn test_denoise_silent_clip_yields_no_segments() {
        let wave = Waveform::new(vec![0.0; 44100], 44100).unwrap();
        let outcome = Segmenter::default().denoise(&wave, None);
        assert!(outcome.is_empty());

        let empty = Waveform::new(Vec::new(), 44100).unwrap();
        assert!(Segmenter::default().denoise(&empty, None).is_empty());
    }

    #[test]
    fn test_denoise_isolated_bursts() {
        let sample_rate = 8000;
        let mut samples = vec![0.01; sample_rate as usize * 4];
        samples[4000] = 0.95;
        samples[4010] = 1.0;
        samples[20000] = -0.9;
        let wave = Waveform::new(samples, sample_rate).unwrap();

        let outcome = Segmenter::default().denoise(&wave, None);
        assert_eq!(outcome.peaks(), vec![4000, 20000]);
        assert!((outcome.segments[1].peak_time_secs() - 2.5).abs() < 1e-6);
    }
}
