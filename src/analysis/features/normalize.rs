// Normalize module - force the time axis to a fixed length
//
// Shorter matrices are zero-padded at the end of the time axis; longer ones
// keep only the first `expected_time_steps` frames. The coefficient axis is
// never touched.

use ndarray::{Array2, Axis};

use super::types::{FeatureMatrix, NormalizedFeatureTensor};
use crate::config::TensorLayout;

/// Pad or truncate to `expected_time_steps` frames and add batch/channel axes.
///
/// # Arguments
/// * `matrix` - (K x frames) feature grid
/// * `expected_time_steps` - Target frame count (T)
/// * `layout` - Axis order of the resulting tensor
///
/// # Returns
/// Tensor of shape `(1, T, K, 1)` or `(1, K, T, 1)`
pub fn normalize_time_axis(
    matrix: &FeatureMatrix,
    expected_time_steps: usize,
    layout: TensorLayout,
) -> NormalizedFeatureTensor {
    let k = matrix.num_coefficients();
    let frames = matrix.num_frames();

    if frames < expected_time_steps {
        log::debug!("[Normalize] Padding {} -> {} frames", frames, expected_time_steps);
    } else if frames > expected_time_steps {
        log::debug!("[Normalize] Truncating {} -> {} frames", frames, expected_time_steps);
    }

    let value_at = |ki: usize, ti: usize| -> f32 {
        if ti < frames {
            matrix.data()[[ki, ti]]
        } else {
            0.0
        }
    };

    let grid: Array2<f32> = match layout {
        TensorLayout::TimeMajor => {
            Array2::from_shape_fn((expected_time_steps, k), |(ti, ki)| value_at(ki, ti))
        }
        TensorLayout::CoefficientMajor => {
            Array2::from_shape_fn((k, expected_time_steps), |(ki, ti)| value_at(ki, ti))
        }
    };

    let tensor = grid.insert_axis(Axis(2)).insert_axis(Axis(0));
    NormalizedFeatureTensor::new(tensor, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// value = k * 1000 + t + 1, never zero
    fn numbered_matrix(k: usize, frames: usize) -> FeatureMatrix {
        FeatureMatrix::new(Array2::from_shape_fn((k, frames), |(ki, ti)| {
            (ki * 1000 + ti + 1) as f32
        }))
    }

    #[test]
    fn test_truncates_to_prefix() {
        let matrix = numbered_matrix(13, 200);
        let tensor = normalize_time_axis(&matrix, 120, TensorLayout::TimeMajor);
        assert_eq!(tensor.shape(), [1, 120, 13, 1]);
        for k in 0..13 {
            for t in 0..120 {
                assert_eq!(tensor.value(k, t), matrix.get(k, t));
            }
        }
    }

    #[test]
    fn test_pads_suffix_with_zeros() {
        let matrix = numbered_matrix(13, 50);
        let tensor = normalize_time_axis(&matrix, 120, TensorLayout::TimeMajor);
        assert_eq!(tensor.shape(), [1, 120, 13, 1]);
        for k in 0..13 {
            for t in 0..50 {
                assert_eq!(tensor.value(k, t), matrix.get(k, t));
            }
            for t in 50..120 {
                assert_eq!(tensor.value(k, t), Some(0.0));
            }
        }
    }

    #[test]
    fn test_equal_length_unchanged() {
        let matrix = numbered_matrix(13, 120);
        let tensor = normalize_time_axis(&matrix, 120, TensorLayout::TimeMajor);
        assert_eq!(tensor.to_feature_matrix(), matrix);
    }

    #[test]
    fn test_coefficient_major_layout() {
        let matrix = numbered_matrix(13, 50);
        let tensor = normalize_time_axis(&matrix, 120, TensorLayout::CoefficientMajor);
        assert_eq!(tensor.shape(), [1, 13, 120, 1]);
        assert_eq!(tensor.data()[[0, 2, 7, 0]], 2008.0);
        assert_eq!(tensor.data()[[0, 2, 70, 0]], 0.0);
    }

    #[test]
    fn test_time_major_flattening_order() {
        let matrix = numbered_matrix(2, 3);
        let tensor = normalize_time_axis(&matrix, 3, TensorLayout::TimeMajor);
        // (t0,k0) (t0,k1) (t1,k0) ...
        assert_eq!(tensor.to_vec(), vec![1.0, 1001.0, 2.0, 1002.0, 3.0, 1003.0]);
    }

    #[test]
    fn test_idempotent() {
        for frames in [0, 13, 50, 120, 200] {
            let once =
                normalize_time_axis(&numbered_matrix(13, frames), 120, TensorLayout::TimeMajor);
            let twice = once.renormalize(120);
            assert_eq!(once, twice, "frames = {}", frames);
        }
    }

    #[test]
    fn test_short_target_variant() {
        let tensor =
            normalize_time_axis(&numbered_matrix(13, 87), 13, TensorLayout::CoefficientMajor);
        assert_eq!(tensor.shape(), [1, 13, 13, 1]);
        assert_eq!(tensor.time_steps(), 13);
        assert_eq!(tensor.num_coefficients(), 13);
    }
}
