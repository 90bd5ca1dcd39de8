use super::{
    Estimator,
    noise::{randint, round2, uniform},
    types::{TrustFactors, TrustQuery, TrustScore},
};
use crate::predictor::{Predictor, TRUST_FEATURES};
use tracing::info;

pub fn trust_features(query: &TrustQuery) -> [f64; TRUST_FEATURES] {
    [query.delivery_rate, query.rating, query.transactions as f64]
}

impl From<&TrustQuery> for TrustFactors {
    fn from(query: &TrustQuery) -> Self {
        Self {
            delivery_rate: query.delivery_rate,
            rating: query.rating,
            transactions: query.transactions,
        }
    }
}

impl TrustFactors {
    /// Plausible-looking values for display when no trust model is loaded.
    pub fn synthetic() -> Self {
        Self {
            delivery_rate: round2(uniform(50.0, 100.0)),
            rating: round2(uniform(3.0, 5.0)),
            transactions: randint(10, 100),
        }
    }
}

/// Positive-class probability when the model exposes at least two classes,
/// otherwise the raw prediction.
pub fn model_trust(predictor: &dyn Predictor, features: &[f64]) -> f64 {
    match predictor.predict_proba(features) {
        Some(probas) if probas.len() >= 2 => probas[1],
        _ => predictor.predict(features),
    }
}

impl Estimator {
    pub fn score_trust(&self, query: &TrustQuery) -> TrustScore {
        match self.models.trust() {
            Some(predictor) => {
                let trust_score = model_trust(predictor, &trust_features(query));
                info!("Trust score {} from model", trust_score);
                TrustScore {
                    trust_score,
                    factors: TrustFactors::from(query),
                }
            }
            None => {
                let trust_score = round2(uniform(0.6, 0.98));
                info!("Trust score {} from stub", trust_score);
                TrustScore {
                    trust_score,
                    factors: TrustFactors::synthetic(),
                }
            }
        }
    }
}
