use farmtrust_ai::{
    estimator::PriceSource,
    llm::ChatCompletionResponse,
    predictor::{LinearRegression, ModelRegistry},
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

mod common;
use common::{
    mocks::{MockLlmClient, MockReference},
    test_utils::{constant_price_model, create_estimator, product_query},
};

#[tokio::test]
async fn test_blends_baseline_and_model_within_noise_band() {
    let llm = Arc::new(MockLlmClient::new());
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(constant_price_model(50.0)),
        Arc::new(MockReference::with_baseline(100.0)),
        Some(llm.clone()),
    );

    for _ in 0..50 {
        let result = estimator.estimate_price(&product_query()).await;
        assert!(
            (74.5..=75.5).contains(&result.suggested_price),
            "{} outside 0.6*100 + 0.3*50 +/- 0.5",
            result.suggested_price
        );
        assert_eq!(result.confidence, 0.9);
    }
    assert!(llm.get_requests().is_empty());
}

#[tokio::test]
async fn test_baseline_only() {
    let reference = Arc::new(MockReference::with_baseline(80.25));
    let estimator = create_estimator(ModelRegistry::empty(), reference.clone(), None);

    let result = estimator.estimate_price(&product_query()).await;

    assert_eq!(result.suggested_price, 80.25);
    assert_eq!(result.confidence, PriceSource::Reference.confidence());
    assert_eq!(
        reference.get_calls(),
        vec![("Tomatoes".to_string(), "Jos".to_string())]
    );
}

#[tokio::test]
async fn test_baseline_is_rounded() {
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::with_baseline(33.3333)),
        None,
    );

    let result = estimator.estimate_price(&product_query()).await;
    assert_eq!(result.suggested_price, 33.33);
}

#[tokio::test]
async fn test_model_only() {
    // quantity 20, description "Fresh roma" (10 characters)
    let model = LinearRegression {
        coefficients: vec![0.5, 0.1, 0.0, 0.0],
        intercept: 2.0,
    };
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(model),
        Arc::new(MockReference::unavailable()),
        None,
    );

    let result = estimator.estimate_price(&product_query()).await;

    assert_eq!(result.suggested_price, 13.0);
    assert_eq!(result.confidence, 0.8);
}

#[tokio::test]
async fn test_reserved_feature_slots_carry_no_signal() {
    let model = LinearRegression {
        coefficients: vec![0.0, 0.0, 100.0, 100.0],
        intercept: 61.0,
    };
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(model),
        Arc::new(MockReference::unavailable()),
        None,
    );

    let mut query = product_query();
    query.origin = "Kano".to_string();
    query.harvest_date = Some("2023-11-20".to_string());

    let result = estimator.estimate_price(&query).await;
    assert_eq!(result.suggested_price, 61.0);
}

#[tokio::test]
async fn test_generative_price_when_no_baseline_or_model() {
    let llm = Arc::new(MockLlmClient::with_texts(&["A fair price is 42.5 USD per crate."]));
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        Some(llm.clone()),
    );

    let result = estimator.estimate_price(&product_query()).await;

    assert_eq!(result.suggested_price, 42.5);
    assert_eq!(result.confidence, 0.7);

    let requests = llm.get_requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].messages.last().unwrap().content;
    assert!(prompt.contains("Tomatoes"));
    assert!(prompt.contains("Jos"));
    assert!(requests[0].messages.iter().all(|m| m.image.is_none()));
}

#[tokio::test]
async fn test_unparseable_generative_answer_falls_back_to_stub() {
    let llm = Arc::new(MockLlmClient::with_texts(&["I cannot estimate that."]));
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        Some(llm),
    );

    let result = estimator.estimate_price(&product_query()).await;

    assert!((40.0..=100.0).contains(&result.suggested_price));
    assert_eq!(result.confidence, 0.65);
}

#[tokio::test]
async fn test_generative_failure_falls_back_to_stub() {
    let llm = Arc::new(MockLlmClient::new().with_error("quota exceeded".to_string()));
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        Some(llm.clone()),
    );

    let result = estimator.estimate_price(&product_query()).await;

    assert!((40.0..=100.0).contains(&result.suggested_price));
    assert_eq!(result.confidence, 0.65);
    assert_eq!(llm.get_requests().len(), 1);
}

#[tokio::test]
async fn test_nothing_available_is_always_stub() {
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        None,
    );

    for _ in 0..100 {
        let result = estimator.estimate_price(&product_query()).await;
        assert!((40.0..=100.0).contains(&result.suggested_price));
        assert_eq!(result.confidence, 0.65);
    }
}

#[tokio::test]
async fn test_off_centre_blend_stays_within_band_after_rounding() {
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(constant_price_model(0.0)),
        Arc::new(MockReference::with_baseline(100.01)),
        None,
    );

    // 0.6 * 100.01 = 60.006, so rounding can move the result 0.004 past the band
    for _ in 0..100 {
        let result = estimator.estimate_price(&product_query()).await;
        assert!(
            (59.5..=60.51).contains(&result.suggested_price),
            "{} outside 60.006 +/- 0.5 plus rounding",
            result.suggested_price
        );
        assert_eq!(result.confidence, 0.9);
    }
}

#[tokio::test]
async fn test_overflowing_model_price_is_treated_as_absent() {
    let model = LinearRegression {
        coefficients: vec![2.0, 0.0, 0.0, 0.0],
        intercept: 0.0,
    };
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(model),
        Arc::new(MockReference::unavailable()),
        None,
    );

    let mut query = product_query();
    query.quantity = 1e308;

    let result = estimator.estimate_price(&query).await;

    assert!(result.suggested_price.is_finite());
    assert!((40.0..=100.0).contains(&result.suggested_price));
    assert_eq!(result.confidence, 0.65);

    let body = serde_json::to_value(&result).unwrap();
    assert!(body["suggested_price"].is_f64());
}

#[tokio::test]
async fn test_overflowing_model_price_keeps_reference_baseline() {
    let model = LinearRegression {
        coefficients: vec![2.0, 0.0, 0.0, 0.0],
        intercept: 0.0,
    };
    let estimator = create_estimator(
        ModelRegistry::empty().with_price(model),
        Arc::new(MockReference::with_baseline(48.5)),
        None,
    );

    let mut query = product_query();
    query.quantity = 1e308;

    let result = estimator.estimate_price(&query).await;

    assert_eq!(result.suggested_price, 48.5);
    assert_eq!(result.confidence, PriceSource::Reference.confidence());
}

#[tokio::test]
async fn test_generative_price_skips_blank_choices() {
    let llm = Arc::new(MockLlmClient::new());
    llm.add_response(ChatCompletionResponse {
        choices: vec!["   ".to_string(), "57.80".to_string()],
    });
    let estimator = create_estimator(
        ModelRegistry::empty(),
        Arc::new(MockReference::unavailable()),
        Some(llm.clone()),
    );

    let result = estimator.estimate_price(&product_query()).await;

    assert_eq!(result.suggested_price, 57.8);
    assert_eq!(result.confidence, PriceSource::Generative.confidence());
    assert_eq!(llm.get_requests()[0].model, "gemini-1.5-flash");
}
