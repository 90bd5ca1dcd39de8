mod client;

pub use client::HttpReferenceClient;

use crate::{Result, config::ReferenceConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Best-effort source of a baseline market price.
///
/// Implementations swallow every failure and answer `None`; callers treat
/// the value as optional enrichment.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_baseline(&self, commodity: &str, region: &str) -> Option<f64>;
}

/// Used when no reference service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReference;

#[async_trait]
impl ReferenceSource for NoReference {
    async fn fetch_baseline(&self, _commodity: &str, _region: &str) -> Option<f64> {
        None
    }
}

pub fn from_config(config: &ReferenceConfig) -> Result<Arc<dyn ReferenceSource>> {
    match config.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(base_url) => {
            info!("Price reference service: {}", base_url);
            Ok(Arc::new(HttpReferenceClient::from_config(base_url, config)?))
        }
        None => {
            info!("No price reference service configured");
            Ok(Arc::new(NoReference))
        }
    }
}
