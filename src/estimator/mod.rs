//! Fallback orchestration for every estimation capability.
//!
//! Each capability walks a fixed list of sources (trained predictor,
//! reference service, generative model, random stub) and answers from the
//! first one that produces a value. Confidence reflects which source answered;
//! it is not a calibrated probability unless it comes straight from a
//! classifier.

mod diagnosis;
mod noise;
mod parse;
mod price;
mod trust;
mod types;

pub use diagnosis::{
    CONSULT_AGRONOMIST, CONSULT_VETERINARIAN, NO_INPUT_DIAGNOSIS, UNKNOWN_DIAGNOSIS,
    livestock_treatment,
};
pub use noise::round2;
pub use parse::{ParsedDiagnosis, extract_price, parse_diagnosis};
pub use price::{PriceSource, blend, price_features};
pub use trust::{model_trust, trust_features};
pub use types::*;

use crate::{llm::GenerativeFallback, predictor::ModelRegistry, reference::ReferenceSource};
use std::sync::Arc;

pub struct Estimator {
    models: Arc<ModelRegistry>,
    reference: Arc<dyn ReferenceSource>,
    generative: Arc<GenerativeFallback>,
}

impl Estimator {
    pub fn new(
        models: Arc<ModelRegistry>,
        reference: Arc<dyn ReferenceSource>,
        generative: Arc<GenerativeFallback>,
    ) -> Self {
        Self {
            models,
            reference,
            generative,
        }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn generative_enabled(&self) -> bool {
        self.generative.is_enabled()
    }
}
