use super::{
    Estimator,
    noise::{round2, uniform},
    parse::extract_price,
    types::{PriceSuggestion, ProductQuery},
};
use crate::predictor::PRICE_FEATURES;
use tracing::{debug, info};

/// Where a suggested price came from. Each source carries a fixed confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Reference baseline and model prediction combined.
    Blended,
    Reference,
    Model,
    Generative,
    Stub,
}

impl PriceSource {
    pub fn confidence(self) -> f64 {
        match self {
            Self::Blended => 0.9,
            Self::Model => 0.8,
            Self::Reference => 0.75,
            Self::Generative => 0.7,
            Self::Stub => 0.65,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blended => "blended",
            Self::Reference => "reference",
            Self::Model => "model",
            Self::Generative => "generative",
            Self::Stub => "stub",
        }
    }
}

/// Feature vector fed to the price model.
///
/// Slots 2 and 3 are reserved for origin and harvest-date encodings that do
/// not exist yet, so they are always zero. Models trained against this layout
/// see no signal from either field.
pub fn price_features(query: &ProductQuery) -> [f64; PRICE_FEATURES] {
    [
        query.quantity,
        query.description.chars().count() as f64,
        0.0,
        0.0,
    ]
}

/// `0.6 * baseline + 0.3 * model`, plus a perturbation in `[-0.5, 0.5]`.
///
/// The band holds for the returned value. The suggested price is rounded to
/// cents afterwards and may sit up to 0.005 past either edge.
pub fn blend(baseline: f64, model: f64) -> f64 {
    0.6 * baseline + 0.3 * model + 0.1 * uniform(-5.0, 5.0)
}

impl Estimator {
    pub async fn estimate_price(&self, query: &ProductQuery) -> PriceSuggestion {
        let (price, source) = match self.primary_price(query).await {
            Some(found) => found,
            None => match self.generative_price(query).await {
                Some(price) => (price, PriceSource::Generative),
                None => (uniform(40.0, 100.0), PriceSource::Stub),
            },
        };

        let suggested_price = round2(price);
        info!(
            "Price for {} ({}): {} from {} source",
            query.product_name,
            query.origin,
            suggested_price,
            source.as_str()
        );

        PriceSuggestion {
            suggested_price,
            confidence: source.confidence(),
        }
    }

    /// Reference baseline and model prediction, blended when both exist.
    async fn primary_price(&self, query: &ProductQuery) -> Option<(f64, PriceSource)> {
        let baseline = self
            .reference
            .fetch_baseline(&query.product_name, &query.origin)
            .await;
        let model_price = self
            .models
            .price()
            .map(|predictor| predictor.predict(&price_features(query)))
            .filter(|price| price.is_finite());

        debug!(
            "Price inputs for {}: baseline={:?} model={:?}",
            query.product_name, baseline, model_price
        );

        match (baseline, model_price) {
            (Some(baseline), Some(model)) => Some((blend(baseline, model), PriceSource::Blended)),
            (Some(baseline), None) => Some((baseline, PriceSource::Reference)),
            (None, Some(model)) => Some((model, PriceSource::Model)),
            (None, None) => None,
        }
    }

    async fn generative_price(&self, query: &ProductQuery) -> Option<f64> {
        let answer = self.generative.ask(&price_prompt(query), None).await;
        let price = answer.text().and_then(extract_price);
        if price.is_none() {
            debug!("No price in generative answer: {}", answer.as_str());
        }
        price
    }
}

fn price_prompt(query: &ProductQuery) -> String {
    let mut prompt = format!(
        "You are an agricultural market analyst. Suggest a fair market price in USD \
         for {} units of {} from {}.",
        query.quantity, query.product_name, query.origin
    );
    if !query.description.trim().is_empty() {
        prompt.push_str(&format!(" Description: {}.", query.description.trim()));
    }
    if let Some(harvest_date) = &query.harvest_date {
        prompt.push_str(&format!(" Harvested on {}.", harvest_date));
    }
    if let Some(asking) = query.price {
        prompt.push_str(&format!(" The seller is asking {}.", asking));
    }
    prompt.push_str(" Reply with a single number only.");
    prompt
}
