// Inference error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Inference error code constants
///
/// Error code range: 4001-4004
pub struct InferenceErrorCodes {}

impl InferenceErrorCodes {
    /// No classifier registered under the requested name
    pub const MODEL_NOT_FOUND: i32 = 4001;

    /// Tensor shape differs from the classifier input shape
    pub const SHAPE_MISMATCH: i32 = 4002;

    /// Classifier returned an empty or non-finite probability vector
    pub const INVALID_OUTPUT: i32 = 4003;

    /// Classifier reported a failure of its own
    pub const PREDICT_FAILED: i32 = 4004;
}

/// Log an inference error with structured context
pub fn log_inference_error(err: &InferenceError, context: &str) {
    error!(
        "Inference error in {}: code={}, component=ModelRegistry, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Classifier boundary errors
///
/// Error code ranges: 4001-4004
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Registry has no model with this name
    ModelNotFound { name: String },

    /// Tensor shape does not match the model input
    ShapeMismatch {
        model: String,
        expected: [usize; 4],
        actual: [usize; 4],
    },

    /// Model output is not a usable probability vector
    InvalidOutput { model: String, reason: String },

    /// Model failed internally
    PredictFailed { model: String, reason: String },
}

impl ErrorCode for InferenceError {
    fn code(&self) -> i32 {
        match self {
            InferenceError::ModelNotFound { .. } => InferenceErrorCodes::MODEL_NOT_FOUND,
            InferenceError::ShapeMismatch { .. } => InferenceErrorCodes::SHAPE_MISMATCH,
            InferenceError::InvalidOutput { .. } => InferenceErrorCodes::INVALID_OUTPUT,
            InferenceError::PredictFailed { .. } => InferenceErrorCodes::PREDICT_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            InferenceError::ModelNotFound { name } => {
                format!("No classifier registered as '{}'", name)
            }
            InferenceError::ShapeMismatch {
                model,
                expected,
                actual,
            } => format!(
                "Model '{}' expects input shape {:?}, got {:?}",
                model, expected, actual
            ),
            InferenceError::InvalidOutput { model, reason } => {
                format!("Model '{}' returned invalid output: {}", model, reason)
            }
            InferenceError::PredictFailed { model, reason } => {
                format!("Model '{}' failed to predict: {}", model, reason)
            }
        }
    }
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InferenceError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for InferenceError {}
