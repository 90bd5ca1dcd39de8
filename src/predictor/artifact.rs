use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A serialized model as produced by the offline training jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    LinearRegression(LinearRegression),
    LogisticRegression(LogisticRegression),
    TextClassifier(TextClassifier),
    PlantClassifier(PlantClassifier),
}

impl Artifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LinearRegression(_) => "linear_regression",
            Self::LogisticRegression(_) => "logistic_regression",
            Self::TextClassifier(_) => "text_classifier",
            Self::PlantClassifier(_) => "plant_classifier",
        }
    }

    /// Checks internal consistency (dimensions, finiteness, labels).
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::LinearRegression(m) => m.validate(),
            Self::LogisticRegression(m) => m.validate(),
            Self::TextClassifier(m) => m.validate(),
            Self::PlantClassifier(m) => m.validate(),
        }
    }
}

/// Numeric predictor over a fixed-shape feature vector.
///
/// Callers must pass exactly `n_features()` values; the registry checks the
/// expected width per capability at load time.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> f64;

    /// Per-class probabilities, for predictors that expose them.
    fn predict_proba(&self, _features: &[f64]) -> Option<Vec<f64>> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear_regression has no coefficients".to_string());
        }
        if !all_finite(&self.coefficients) || !self.intercept.is_finite() {
            return Err("linear_regression has non-finite parameters".to_string());
        }
        Ok(())
    }
}

impl Predictor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> f64 {
        dot(&self.coefficients, features) + self.intercept
    }
}

/// Binary models carry a single coefficient row scored through a sigmoid,
/// multi-class models carry one row per class scored through a softmax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<f64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1
    }

    fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "logistic_regression needs at least 2 classes, found {}",
                self.classes.len()
            ));
        }
        let expected_rows = if self.classes.len() == 2 && self.coefficients.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != expected_rows {
            return Err(format!(
                "logistic_regression expected {} coefficient rows, found {}",
                expected_rows,
                self.coefficients.len()
            ));
        }
        if self.intercepts.len() != expected_rows {
            return Err(format!(
                "logistic_regression expected {} intercepts, found {}",
                expected_rows,
                self.intercepts.len()
            ));
        }
        let width = self.coefficients[0].len();
        if width == 0 || self.coefficients.iter().any(|row| row.len() != width) {
            return Err("logistic_regression coefficient rows must share a non-zero width".to_string());
        }
        if self.coefficients.iter().any(|row| !all_finite(row)) || !all_finite(&self.intercepts) {
            return Err("logistic_regression has non-finite parameters".to_string());
        }
        Ok(())
    }

    fn probabilities(&self, features: &[f64]) -> Vec<f64> {
        if self.is_binary() {
            let p = sigmoid(dot(&self.coefficients[0], features) + self.intercepts[0]);
            return vec![1.0 - p, p];
        }

        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| dot(row, features) + b)
            .collect();
        softmax(&scores)
    }
}

impl Predictor for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn predict(&self, features: &[f64]) -> f64 {
        let probas = self.probabilities(features);
        self.classes[argmax(&probas)]
    }

    fn predict_proba(&self, features: &[f64]) -> Option<Vec<f64>> {
        Some(self.probabilities(features))
    }
}

/// Bag-of-words linear classifier over free text (TF-IDF style features).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClassifier {
    pub labels: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl TextClassifier {
    fn validate(&self) -> Result<(), String> {
        if self.labels.is_empty() {
            return Err("text_classifier has no labels".to_string());
        }
        if self.weights.len() != self.labels.len() || self.intercepts.len() != self.labels.len() {
            return Err(format!(
                "text_classifier expected {} weight rows and intercepts, found {} and {}",
                self.labels.len(),
                self.weights.len(),
                self.intercepts.len()
            ));
        }
        let width = self.vocabulary.len();
        if self.weights.iter().any(|row| row.len() != width) {
            return Err(format!(
                "text_classifier weight rows must have {} entries (vocabulary size)",
                width
            ));
        }
        if let Some((token, _)) = self.vocabulary.iter().find(|(_, idx)| **idx >= width) {
            return Err(format!("text_classifier token '{}' has an out-of-range index", token));
        }
        if let Some(idf) = &self.idf {
            if idf.len() != width {
                return Err(format!(
                    "text_classifier idf must have {} entries, found {}",
                    width,
                    idf.len()
                ));
            }
        }
        Ok(())
    }

    /// Term counts scaled by idf, then L2-normalized.
    pub fn vectorize(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                features[idx] += 1.0;
            }
        }
        if let Some(idf) = &self.idf {
            for (value, weight) in features.iter_mut().zip(idf) {
                *value *= weight;
            }
        }
        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }
        features
    }

    pub fn predict_label(&self, text: &str) -> &str {
        let features = self.vectorize(text);
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| dot(row, &features) + b)
            .collect();
        &self.labels[argmax(&scores)]
    }
}

/// Image/text plant health classifier. Only its presence is used today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantClassifier {
    pub labels: Vec<String>,
}

impl PlantClassifier {
    fn validate(&self) -> Result<(), String> {
        if self.labels.is_empty() {
            return Err("plant_classifier has no labels".to_string());
        }
        Ok(())
    }
}

/// Lower-cased alphanumeric words of two or more characters.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
}

fn dot(weights: &[f64], features: &[f64]) -> f64 {
    weights.iter().zip(features).map(|(w, x)| w * x).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

// First index wins on ties.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_value), (idx, &value)| {
            if value > best_value {
                (idx, value)
            } else {
                (best, best_value)
            }
        })
        .0
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
