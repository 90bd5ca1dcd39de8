use super::ReferenceSource;
use crate::{Result, config::ReferenceConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Body returned by the price reference service. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct BaselineQuote {
    price: f64,
}

/// HTTP client for the commodity price reference service.
///
/// Queries `GET {base_url}/prices?commodity=..&region=..` and reads the
/// `price` field of the JSON body.
pub struct HttpReferenceClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpReferenceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(base_url: &str, config: &ReferenceConfig) -> Result<Self> {
        Self::new(
            base_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn request_baseline(&self, commodity: &str, region: &str) -> Result<Option<f64>> {
        let url = format!("{}/prices", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("commodity", commodity), ("region", region)]);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!(
                "Price reference returned {} for {} ({})",
                response.status(),
                commodity,
                region
            );
            return Ok(None);
        }

        let quote: BaselineQuote = response.json().await?;
        if !quote.price.is_finite() || quote.price <= 0.0 {
            warn!(
                "Price reference returned unusable price {} for {} ({})",
                quote.price, commodity, region
            );
            return Ok(None);
        }

        Ok(Some(quote.price))
    }
}

#[async_trait]
impl ReferenceSource for HttpReferenceClient {
    async fn fetch_baseline(&self, commodity: &str, region: &str) -> Option<f64> {
        match self.request_baseline(commodity, region).await {
            Ok(price) => {
                debug!("Baseline for {} ({}): {:?}", commodity, region, price);
                price
            }
            Err(e) => {
                warn!(
                    "Price reference unavailable for {} ({}): {}",
                    commodity, region, e
                );
                None
            }
        }
    }
}
