use super::mocks::{MockLlmClient, MockReference};
use farmtrust_ai::{
    estimator::{Estimator, LivestockQuery, ProductQuery, TrustQuery},
    llm::GenerativeFallback,
    predictor::{LinearRegression, LogisticRegression, ModelRegistry, TextClassifier},
};
use serde_json::json;
use std::sync::Arc;

/// Build an estimator from mocks. `llm: None` disables the generative tier.
pub fn create_estimator(
    models: ModelRegistry,
    reference: Arc<MockReference>,
    llm: Option<Arc<MockLlmClient>>,
) -> Estimator {
    let generative = match llm {
        Some(client) => GenerativeFallback::with_client(client, "gemini-1.5-flash", None),
        None => GenerativeFallback::disabled(),
    };
    Estimator::new(Arc::new(models), reference, Arc::new(generative))
}

/// Estimator with no predictors, no reference and no generative model.
pub fn create_bare_estimator() -> Estimator {
    create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        None,
    )
}

/// Price model that ignores its inputs and always predicts `price`.
pub fn constant_price_model(price: f64) -> LinearRegression {
    LinearRegression {
        coefficients: vec![0.0, 0.0, 0.0, 0.0],
        intercept: price,
    }
}

pub fn trust_model() -> LogisticRegression {
    LogisticRegression {
        classes: vec![0.0, 1.0],
        coefficients: vec![vec![0.04, 0.9, 0.01]],
        intercepts: vec![-7.0],
    }
}

pub fn livestock_model() -> TextClassifier {
    serde_json::from_value(json!({
        "labels": ["Anthrax", "Newcastle Disease", "Blackleg"],
        "vocabulary": {
            "fever": 0, "bleeding": 1, "sudden": 2,
            "coughing": 3, "twisted": 4, "neck": 5,
            "lameness": 6, "swelling": 7
        },
        "weights": [
            [0.6, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.3, 0.0, 0.0, 1.5, 1.5, 1.0, 0.0, 0.0],
            [0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0]
        ],
        "intercepts": [0.0, 0.0, 0.0]
    }))
    .unwrap()
}

pub fn product_query() -> ProductQuery {
    ProductQuery {
        product_name: "Tomatoes".to_string(),
        description: "Fresh roma".to_string(),
        origin: "Jos".to_string(),
        harvest_date: Some("2024-06-01".to_string()),
        quantity: 20.0,
        price: None,
    }
}

pub fn trust_query(delivery_rate: f64, rating: f64, transactions: u64) -> TrustQuery {
    TrustQuery {
        delivery_rate,
        rating,
        transactions,
    }
}

pub fn livestock_query(animal: &str, symptoms: &str) -> LivestockQuery {
    LivestockQuery {
        animal: animal.to_string(),
        symptoms: symptoms.to_string(),
    }
}
