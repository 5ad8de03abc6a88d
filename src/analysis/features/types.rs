// Types module - feature matrix and classifier tensor
//
// FeatureMatrix is the raw (coefficients x frames) grid; the tensor is the
// fixed-shape artifact handed across the classifier boundary.

use ndarray::{Array2, Array4, Axis};

use crate::config::TensorLayout;

/// Cepstral coefficients over time: rows = coefficient index, cols = frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f32>,
}

impl FeatureMatrix {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Row count (K)
    pub fn num_coefficients(&self) -> usize {
        self.data.nrows()
    }

    /// Column count; varies with clip duration
    pub fn num_frames(&self) -> usize {
        self.data.ncols()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Coefficient `k` at frame `t`
    pub fn get(&self, k: usize, t: usize) -> Option<f32> {
        self.data.get((k, t)).copied()
    }
}

/// Time-normalized features with batch and channel axes.
///
/// Shape is `(1, T, K, 1)` for `TimeMajor` and `(1, K, T, 1)` for
/// `CoefficientMajor`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeatureTensor {
    data: Array4<f32>,
    layout: TensorLayout,
}

impl NormalizedFeatureTensor {
    pub(crate) fn new(data: Array4<f32>, layout: TensorLayout) -> Self {
        Self { data, layout }
    }

    pub fn shape(&self) -> [usize; 4] {
        let dims = self.data.shape();
        [dims[0], dims[1], dims[2], dims[3]]
    }

    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    pub fn time_steps(&self) -> usize {
        match self.layout {
            TensorLayout::TimeMajor => self.data.len_of(Axis(1)),
            TensorLayout::CoefficientMajor => self.data.len_of(Axis(2)),
        }
    }

    pub fn num_coefficients(&self) -> usize {
        match self.layout {
            TensorLayout::TimeMajor => self.data.len_of(Axis(2)),
            TensorLayout::CoefficientMajor => self.data.len_of(Axis(1)),
        }
    }

    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    /// Value for coefficient `k` at time step `t`, independent of layout
    pub fn value(&self, k: usize, t: usize) -> Option<f32> {
        let index = match self.layout {
            TensorLayout::TimeMajor => (0, t, k, 0),
            TensorLayout::CoefficientMajor => (0, k, t, 0),
        };
        self.data.get(index).copied()
    }

    /// Values flattened in row-major order of `shape()`
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// Drop the batch/channel axes and return the (K x T) grid.
    pub fn to_feature_matrix(&self) -> FeatureMatrix {
        let (k, t) = (self.num_coefficients(), self.time_steps());
        FeatureMatrix::new(Array2::from_shape_fn((k, t), |(ki, ti)| {
            self.value(ki, ti).unwrap_or(0.0)
        }))
    }

    /// Re-apply time normalization with a (possibly different) length.
    pub fn renormalize(&self, expected_time_steps: usize) -> NormalizedFeatureTensor {
        super::normalize_time_axis(&self.to_feature_matrix(), expected_time_steps, self.layout)
    }
}
