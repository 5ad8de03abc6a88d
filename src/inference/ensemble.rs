// Ensemble - primary classifiers plus a gated secondary classifier
//
// All primary models run on the same tensor. The secondary model runs only
// when both gate models agree under the configured `GatingMode`.
//
// `GatingMode::ClassIndex` reproduces the rule the deployed models were
// tuned with: both gate models predict the positive class and their class
// indices differ by at most `max_difference`. With binary classifiers the
// difference term is always 0 once both predict the positive class, so the
// threshold has no effect. `GatingMode::Confidence` compares the
// positive-class percentages instead.

use serde::{Deserialize, Serialize};

use crate::analysis::NormalizedFeatureTensor;
use crate::config::{EnsembleConfig, GatingMode};
use crate::error::InferenceError;
use crate::inference::{ModelRegistry, Prediction};

/// Predictions for one tensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleReport {
    /// Primary model outputs in configured order
    pub primary: Vec<Prediction>,
    pub gate_open: bool,
    /// Present only when the gate opened
    pub secondary: Option<Prediction>,
}

impl EnsembleReport {
    pub fn prediction(&self, model: &str) -> Option<&Prediction> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .find(|prediction| prediction.model == model)
    }
}

/// Evaluate the gate for two gate-model predictions
pub fn gate_opens(gating: &GatingMode, a: &Prediction, b: &Prediction) -> bool {
    match *gating {
        GatingMode::ClassIndex {
            positive_class,
            max_difference,
        } => {
            a.class_index == positive_class
                && b.class_index == positive_class
                && a.class_index.abs_diff(b.class_index) <= max_difference
        }
        GatingMode::Confidence {
            positive_class,
            max_difference_pct,
        } => {
            a.class_index == positive_class
                && b.class_index == positive_class
                && (a.percentage(positive_class) - b.percentage(positive_class)).abs()
                    <= max_difference_pct
        }
    }
}

/// Run the configured ensemble against one tensor
///
/// # Errors
/// Any registry error from a primary model, a gate model missing from the
/// primary list, or a secondary model failure once the gate opened
pub fn run_ensemble(
    registry: &ModelRegistry,
    config: &EnsembleConfig,
    tensor: &NormalizedFeatureTensor,
) -> Result<EnsembleReport, InferenceError> {
    let primary = config
        .primary_models
        .iter()
        .map(|name| registry.predict(name, tensor))
        .collect::<Result<Vec<_>, _>>()?;

    let find = |name: &str| -> Result<&Prediction, InferenceError> {
        primary
            .iter()
            .find(|prediction| prediction.model == name)
            .ok_or_else(|| InferenceError::ModelNotFound {
                name: name.to_string(),
            })
    };
    let (gate_a, gate_b) = (&config.gate_models.0, &config.gate_models.1);
    let gate_open = gate_opens(&config.gating, find(gate_a)?, find(gate_b)?);

    let secondary = if gate_open {
        log::info!(
            "[Ensemble] Gate {}/{} open, consulting '{}'",
            gate_a,
            gate_b,
            config.secondary_model
        );
        Some(registry.predict(&config.secondary_model, tensor)?)
    } else {
        None
    };

    Ok(EnsembleReport {
        primary,
        gate_open,
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{normalize_time_axis, FeatureMatrix};
    use crate::config::TensorLayout;
    use crate::inference::registry::test_support::FixedClassifier;
    use ndarray::Array2;

    fn tensor() -> NormalizedFeatureTensor {
        normalize_time_axis(
            &FeatureMatrix::new(Array2::zeros((13, 10))),
            120,
            TensorLayout::TimeMajor,
        )
    }

    fn registry(p: Vec<f32>, b: Vec<f32>) -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register("P", FixedClassifier::new(p));
        registry.register("B", FixedClassifier::new(b));
        registry.register("C", FixedClassifier::new(vec![0.7, 0.3]));
        registry.register("BP", FixedClassifier::new(vec![0.4, 0.6]));
        registry
    }

    #[test]
    fn test_secondary_runs_when_both_gate_models_positive() {
        let registry = registry(vec![0.1, 0.9], vec![0.45, 0.55]);
        let report = run_ensemble(&registry, &EnsembleConfig::default(), &tensor()).unwrap();

        assert_eq!(report.primary.len(), 3);
        assert!(report.gate_open);
        assert_eq!(report.secondary.as_ref().unwrap().model, "BP");
        assert_eq!(report.prediction("BP").unwrap().class_index, 1);
    }

    #[test]
    fn test_secondary_skipped_when_one_gate_model_negative() {
        let registry = registry(vec![0.1, 0.9], vec![0.8, 0.2]);
        let report = run_ensemble(&registry, &EnsembleConfig::default(), &tensor()).unwrap();
        assert!(!report.gate_open);
        assert!(report.secondary.is_none());
    }

    #[test]
    fn test_confidence_gating_uses_percentages() {
        let mut config = EnsembleConfig::default();
        config.gating = GatingMode::Confidence {
            positive_class: 1,
            max_difference_pct: 10.0,
        };

        // 90% vs 55%: both positive but 35 points apart.
        let report = run_ensemble(&registry(vec![0.1, 0.9], vec![0.45, 0.55]), &config, &tensor())
            .unwrap();
        assert!(!report.gate_open);

        // 90% vs 85%: within 10 points.
        let report = run_ensemble(&registry(vec![0.1, 0.9], vec![0.15, 0.85]), &config, &tensor())
            .unwrap();
        assert!(report.gate_open);
    }

    #[test]
    fn test_class_index_threshold_never_binds_for_binary_models() {
        let a = Prediction::from_probabilities("P", vec![0.0, 1.0]);
        let b = Prediction::from_probabilities("B", vec![0.49, 0.51]);
        let strict = GatingMode::ClassIndex {
            positive_class: 1,
            max_difference: 0,
        };
        assert!(gate_opens(&strict, &a, &b));
        assert!(gate_opens(&GatingMode::default(), &a, &b));
    }

    #[test]
    fn test_missing_secondary_is_error_only_when_gate_opens() {
        let mut registry = ModelRegistry::new();
        registry.register("P", FixedClassifier::new(vec![0.9, 0.1]));
        registry.register("B", FixedClassifier::new(vec![0.9, 0.1]));
        registry.register("C", FixedClassifier::new(vec![0.9, 0.1]));
        assert!(run_ensemble(&registry, &EnsembleConfig::default(), &tensor()).is_ok());

        registry.register("P", FixedClassifier::new(vec![0.1, 0.9]));
        registry.register("B", FixedClassifier::new(vec![0.1, 0.9]));
        assert!(matches!(
            run_ensemble(&registry, &EnsembleConfig::default(), &tensor()),
            Err(InferenceError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_gate_model_must_be_primary() {
        let mut config = EnsembleConfig::default();
        config.primary_models = vec!["P".to_string(), "C".to_string()];
        let err = run_ensemble(&registry(vec![0.1, 0.9], vec![0.1, 0.9]), &config, &tensor())
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::ModelNotFound {
                name: "B".to_string()
            }
        );
    }
}
