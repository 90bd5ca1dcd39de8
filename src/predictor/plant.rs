use super::artifact::PlantClassifier;

/// Output of a plant health model before it is shaped into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantPrediction {
    pub label: String,
    pub confidence: f64,
    pub treatment: Vec<String>,
}

/// Plant health inference, by photo or by symptom description.
///
/// This is the integration point for a real image/text model. The only
/// implementation today is [`PlaceholderPlantModel`], which answers with
/// fixed diagnoses whenever a plant artifact is deployed.
pub trait PlantModel: Send + Sync + std::fmt::Debug {
    fn predict_from_image(&self, image: &[u8]) -> PlantPrediction;

    fn predict_from_text(&self, description: &str) -> PlantPrediction;
}

/// Fixed answers standing in for the not-yet-integrated CNN.
#[derive(Debug, Clone)]
pub struct PlaceholderPlantModel {
    labels: Vec<String>,
}

impl PlaceholderPlantModel {
    pub fn new(classifier: PlantClassifier) -> Self {
        Self {
            labels: classifier.labels,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl PlantModel for PlaceholderPlantModel {
    fn predict_from_image(&self, _image: &[u8]) -> PlantPrediction {
        PlantPrediction {
            label: "Early Blight (Alternaria solani)".to_string(),
            confidence: 0.94,
            treatment: vec![
                "Apply copper-based fungicide weekly".to_string(),
                "Improve air circulation around plants".to_string(),
                "Remove affected leaves immediately".to_string(),
            ],
        }
    }

    fn predict_from_text(&self, _description: &str) -> PlantPrediction {
        PlantPrediction {
            label: "Nutrient Deficiency (Nitrogen)".to_string(),
            confidence: 0.88,
            treatment: vec![
                "Apply nitrogen-rich fertilizer".to_string(),
                "Rotate crops with legumes".to_string(),
                "Test soil for nutrient balance".to_string(),
            ],
        }
    }
}
