use crate::llm::ImagePayload;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductQuery {
    #[validate(length(min = 1))]
    pub product_name: String,
    pub description: String,
    #[validate(length(min = 1))]
    pub origin: String,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    /// Seller's asking price, if any.
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrustQuery {
    /// Percentage of orders delivered on time.
    #[validate(range(min = 0.0, max = 100.0))]
    pub delivery_rate: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LivestockQuery {
    #[validate(length(min = 1))]
    pub animal: String,
    #[serde(default)]
    pub symptoms: String,
}

/// Plant diagnosis input, assembled from a multipart form.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisQuery {
    pub image: Option<ImagePayload>,
    pub description: Option<String>,
}

/// What a plant diagnosis will be based on. An image wins over text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosisInput<'a> {
    Image(&'a ImagePayload),
    Text(&'a str),
    Missing,
}

impl DiagnosisQuery {
    pub fn from_image(image: ImagePayload) -> Self {
        Self {
            image: Some(image),
            description: None,
        }
    }

    pub fn from_text(description: impl Into<String>) -> Self {
        Self {
            image: None,
            description: Some(description.into()),
        }
    }

    pub fn input(&self) -> DiagnosisInput<'_> {
        if let Some(image) = self.image.as_ref().filter(|img| !img.bytes.is_empty()) {
            return DiagnosisInput::Image(image);
        }
        match self.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => DiagnosisInput::Text(text),
            _ => DiagnosisInput::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub suggested_price: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    pub trust_score: f64,
    pub factors: TrustFactors,
}

/// Inputs behind a trust score. Without a trust model these are
/// presentation stand-ins, not measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustFactors {
    pub delivery_rate: f64,
    pub rating: f64,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub diagnosis: String,
    pub confidence: f64,
    pub treatment: Vec<String>,
}
