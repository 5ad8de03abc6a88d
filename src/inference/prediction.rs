use serde::{Deserialize, Serialize};

/// One classifier's output for one tensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub model: String,
    /// Class probabilities as returned by the model
    pub probabilities: Vec<f32>,
    /// Argmax over `probabilities` (first index wins on ties)
    pub class_index: usize,
    /// `probabilities * 100`, rounded to 2 decimals
    pub percentages: Vec<f32>,
}

impl Prediction {
    /// Build from a non-empty probability vector
    pub fn from_probabilities(model: &str, probabilities: Vec<f32>) -> Self {
        let class_index = argmax(&probabilities);
        let percentages = probabilities
            .iter()
            .map(|p| (p * 100.0 * 100.0).round() / 100.0)
            .collect();
        Self {
            model: model.to_string(),
            probabilities,
            class_index,
            percentages,
        }
    }

    /// Percentages rounded up to whole numbers (display table form)
    pub fn ceil_percentages(&self) -> Vec<f32> {
        self.probabilities.iter().map(|p| (p * 100.0).ceil()).collect()
    }

    /// Percentage for `class`, 0.0 when out of range
    pub fn percentage(&self, class: usize) -> f32 {
        self.percentages.get(class).copied().unwrap_or(0.0)
    }

    pub fn confidence(&self) -> f32 {
        self.probabilities
            .get(self.class_index)
            .copied()
            .unwrap_or(0.0)
    }
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_round_to_two_decimals() {
        let prediction = Prediction::from_probabilities("P", vec![0.123456, 0.876544]);
        assert_eq!(prediction.class_index, 1);
        assert!((prediction.percentages[0] - 12.35).abs() < 1e-4);
        assert!((prediction.percentages[1] - 87.65).abs() < 1e-4);
        assert!((prediction.confidence() - 0.876544).abs() < 1e-6);
    }

    #[test]
    fn test_ceil_percentages() {
        let prediction = Prediction::from_probabilities("B", vec![0.101, 0.899]);
        assert_eq!(prediction.ceil_percentages(), vec![11.0, 90.0]);
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        let prediction = Prediction::from_probabilities("C", vec![0.5, 0.5]);
        assert_eq!(prediction.class_index, 0);
    }

    #[test]
    fn test_percentage_out_of_range() {
        let prediction = Prediction::from_probabilities("C", vec![1.0]);
        assert_eq!(prediction.percentage(3), 0.0);
    }
}
