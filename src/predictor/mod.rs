mod artifact;
mod plant;

pub use artifact::{
    Artifact, LinearRegression, LogisticRegression, PlantClassifier, Predictor, TextClassifier,
};
pub use plant::{PlaceholderPlantModel, PlantModel, PlantPrediction};

use crate::{Error, Result};
use serde::Serialize;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};

/// Width of the price feature vector: quantity, description length and two
/// reserved slots.
pub const PRICE_FEATURES: usize = 4;

/// Width of the trust feature vector: delivery rate, rating, transactions.
pub const TRUST_FEATURES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Price,
    Trust,
    Livestock,
    Plant,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Price,
        Capability::Trust,
        Capability::Livestock,
        Capability::Plant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Trust => "trust",
            Self::Livestock => "livestock",
            Self::Plant => "plant",
        }
    }

    pub fn artifact_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}_model.json", self.as_str()))
    }
}

/// Reads the artifact for `capability` from `dir`.
///
/// A missing file is `Ok(None)`. A file that exists but cannot be read,
/// parsed or validated is an error: serving with a half-usable model is
/// worse than not starting.
pub async fn load_artifact(dir: &Path, capability: Capability) -> Result<Option<Artifact>> {
    let path = capability.artifact_path(dir);

    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(
                "No {} model at {}, capability will use fallbacks",
                capability.as_str(),
                path.display()
            );
            return Ok(None);
        }
        Err(e) => return Err(Error::model(format!("{}: {}", path.display(), e))),
    };

    let artifact: Artifact = serde_json::from_str(&contents)
        .map_err(|e| Error::model(format!("{}: {}", path.display(), e)))?;
    artifact
        .validate()
        .map_err(|e| Error::model(format!("{}: {}", path.display(), e)))?;

    debug!("Read {} artifact from {}", artifact.kind(), path.display());
    Ok(Some(artifact))
}

/// Which predictors are loaded, as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub price: bool,
    pub trust: bool,
    pub livestock: bool,
    pub plant: bool,
}

/// Predictors available to this process. Built once at startup, read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    price: Option<Arc<dyn Predictor>>,
    trust: Option<Arc<dyn Predictor>>,
    livestock: Option<Arc<TextClassifier>>,
    plant: Option<Arc<dyn PlantModel>>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading models from {}", dir.display());

        let mut registry = Self::empty();
        for capability in Capability::ALL {
            let Some(artifact) = load_artifact(dir, capability).await? else {
                continue;
            };
            registry = registry.install(capability, artifact)?;
            info!("Loaded {} model", capability.as_str());
        }

        Ok(registry)
    }

    /// Wires an artifact into the slot for `capability`, checking that its
    /// kind and input width fit that capability.
    pub fn install(mut self, capability: Capability, artifact: Artifact) -> Result<Self> {
        let kind = artifact.kind();
        match (capability, artifact) {
            (Capability::Price, artifact) => {
                self.price = Some(numeric(capability, artifact, PRICE_FEATURES)?);
            }
            (Capability::Trust, artifact) => {
                self.trust = Some(numeric(capability, artifact, TRUST_FEATURES)?);
            }
            (Capability::Livestock, Artifact::TextClassifier(model)) => {
                self.livestock = Some(Arc::new(model));
            }
            (Capability::Plant, Artifact::PlantClassifier(model)) => {
                self.plant = Some(Arc::new(PlaceholderPlantModel::new(model)));
            }
            (capability, _) => return Err(wrong_kind(capability, kind)),
        }
        Ok(self)
    }

    pub fn with_price(mut self, predictor: impl Predictor + 'static) -> Self {
        self.price = Some(Arc::new(predictor));
        self
    }

    pub fn with_trust(mut self, predictor: impl Predictor + 'static) -> Self {
        self.trust = Some(Arc::new(predictor));
        self
    }

    pub fn with_livestock(mut self, classifier: TextClassifier) -> Self {
        self.livestock = Some(Arc::new(classifier));
        self
    }

    pub fn with_plant(mut self, model: impl PlantModel + 'static) -> Self {
        self.plant = Some(Arc::new(model));
        self
    }

    pub fn price(&self) -> Option<&dyn Predictor> {
        self.price.as_deref()
    }

    pub fn trust(&self) -> Option<&dyn Predictor> {
        self.trust.as_deref()
    }

    pub fn livestock(&self) -> Option<&TextClassifier> {
        self.livestock.as_deref()
    }

    pub fn plant(&self) -> Option<&dyn PlantModel> {
        self.plant.as_deref()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            price: self.price.is_some(),
            trust: self.trust.is_some(),
            livestock: self.livestock.is_some(),
            plant: self.plant.is_some(),
        }
    }
}

fn numeric(
    capability: Capability,
    artifact: Artifact,
    expected_features: usize,
) -> Result<Arc<dyn Predictor>> {
    let predictor: Arc<dyn Predictor> = match artifact {
        Artifact::LinearRegression(model) => Arc::new(model),
        Artifact::LogisticRegression(model) => Arc::new(model),
        other => return Err(wrong_kind(capability, other.kind())),
    };

    if predictor.n_features() != expected_features {
        return Err(Error::model(format!(
            "{} model expects {} features, found {}",
            capability.as_str(),
            expected_features,
            predictor.n_features()
        )));
    }

    Ok(predictor)
}

fn wrong_kind(capability: Capability, kind: &str) -> Error {
    Error::model(format!(
        "{} model cannot be a {} artifact",
        capability.as_str(),
        kind
    ))
}
