// ModelRegistry - explicit, caller-owned handle to loaded classifiers
//
// Built once at process start and passed by reference to anything that
// needs inference. There is no hidden global model cache.

use std::collections::BTreeMap;

use crate::analysis::NormalizedFeatureTensor;
use crate::error::{log_inference_error, InferenceError};
use crate::inference::Prediction;

/// Opaque pre-trained classifier: tensor in, class probabilities out.
pub trait Classifier: Send + Sync {
    /// Input shape the model was built for, if it is fixed
    fn input_shape(&self) -> Option<[usize; 4]>;

    fn predict(&self, tensor: &NormalizedFeatureTensor) -> Result<Vec<f32>, InferenceError>;
}

/// Named set of classifiers
#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Box<dyn Classifier>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a classifier under `name`
    pub fn register<C: Classifier + 'static>(&mut self, name: impl Into<String>, classifier: C) {
        let name = name.into();
        if self.models.insert(name.clone(), Box::new(classifier)).is_some() {
            log::warn!("[ModelRegistry] Replaced classifier '{}'", name);
        } else {
            log::info!("[ModelRegistry] Registered classifier '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Classifier> {
        self.models.get(name).map(|model| model.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Run the named classifier, validating input shape and output vector
    pub fn predict(
        &self,
        name: &str,
        tensor: &NormalizedFeatureTensor,
    ) -> Result<Prediction, InferenceError> {
        self.predict_checked(name, tensor).inspect_err(|err| {
            log_inference_error(err, "ModelRegistry::predict");
        })
    }

    fn predict_checked(
        &self,
        name: &str,
        tensor: &NormalizedFeatureTensor,
    ) -> Result<Prediction, InferenceError> {
        let model = self.get(name).ok_or_else(|| InferenceError::ModelNotFound {
            name: name.to_string(),
        })?;

        if let Some(expected) = model.input_shape() {
            let actual = tensor.shape();
            if expected != actual {
                return Err(InferenceError::ShapeMismatch {
                    model: name.to_string(),
                    expected,
                    actual,
                });
            }
        }

        let probabilities = model.predict(tensor)?;
        if probabilities.is_empty() {
            return Err(InferenceError::InvalidOutput {
                model: name.to_string(),
                reason: "empty probability vector".to_string(),
            });
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::InvalidOutput {
                model: name.to_string(),
                reason: "non-finite probability".to_string(),
            });
        }

        let prediction = Prediction::from_probabilities(name, probabilities);
        log::debug!(
            "[ModelRegistry] {}: {:?} -> class {}",
            name,
            prediction.percentages,
            prediction.class_index
        );
        Ok(prediction)
    }
}
