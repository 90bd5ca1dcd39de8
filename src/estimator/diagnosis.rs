use super::{
    Estimator,
    noise::{round2, uniform},
    parse::parse_diagnosis,
    types::{Diagnosis, DiagnosisInput, DiagnosisQuery, LivestockQuery},
};
use crate::{llm::Answer, predictor::PlantPrediction};
use tracing::info;

pub const NO_INPUT_DIAGNOSIS: &str = "No input provided";
pub const UNKNOWN_DIAGNOSIS: &str = "Unknown";
pub const CONSULT_AGRONOMIST: &str = "Consult an agronomist";
pub const CONSULT_VETERINARIAN: &str = "Consult a veterinary doctor";

const PLANT_IMAGE_PROMPT: &str =
    "You are an agricultural expert. Diagnose this crop disease and suggest treatment.";

impl Diagnosis {
    /// Shown when the request carried nothing to diagnose.
    pub fn no_input(message: &str) -> Self {
        Self {
            diagnosis: NO_INPUT_DIAGNOSIS.to_string(),
            confidence: 0.0,
            treatment: vec![message.to_string()],
        }
    }

    /// Shapes a generative answer. Unusable answers become `Unknown` with a
    /// single referral.
    pub fn from_answer(answer: &Answer, confidence: f64, referral: &str) -> Self {
        match answer.text().and_then(parse_diagnosis) {
            Some(parsed) => Self {
                diagnosis: parsed.label,
                confidence,
                treatment: parsed.treatment,
            },
            None => Self {
                diagnosis: UNKNOWN_DIAGNOSIS.to_string(),
                confidence,
                treatment: vec![referral.to_string()],
            },
        }
    }
}

impl From<PlantPrediction> for Diagnosis {
    fn from(prediction: PlantPrediction) -> Self {
        Self {
            diagnosis: prediction.label,
            confidence: prediction.confidence,
            treatment: prediction.treatment,
        }
    }
}

/// Curated treatments for the livestock diseases the model is known to emit.
pub fn livestock_treatment(label: &str) -> Vec<String> {
    let steps: &[&str] = match label {
        "Foot and Mouth Disease" => &[
            "Isolate affected animals",
            "Disinfect barns",
            "Vaccinate healthy animals",
        ],
        "Anthrax" => &[
            "Burn/dispose carcasses",
            "Avoid opening carcasses",
            "Vaccinate livestock in endemic areas",
        ],
        "Newcastle Disease" => &[
            "Vaccinate poultry",
            "Quarantine infected flocks",
            "Maintain biosecurity",
        ],
        _ => &[CONSULT_VETERINARIAN],
    };
    steps.iter().map(|step| step.to_string()).collect()
}

fn plant_text_prompt(description: &str) -> String {
    format!("Diagnose plant disease from text description: {}", description)
}

fn livestock_prompt(animal: &str, symptoms: &str) -> String {
    format!(
        "You are a veterinary expert. Diagnose the disease of this {} from the symptoms \
         and suggest treatment. Answer with the disease name on the first line and one \
         treatment step per following line. Symptoms: {}",
        animal, symptoms
    )
}

impl Estimator {
    pub async fn diagnose_plant(&self, query: &DiagnosisQuery) -> Diagnosis {
        let diagnosis = match (query.input(), self.models.plant()) {
            (DiagnosisInput::Missing, _) => {
                Diagnosis::no_input("Please upload an image or describe the symptoms")
            }
            (DiagnosisInput::Image(image), Some(model)) => {
                model.predict_from_image(&image.bytes).into()
            }
            (DiagnosisInput::Text(description), Some(model)) => {
                model.predict_from_text(description).into()
            }
            (DiagnosisInput::Image(image), None) => {
                let answer = self.generative.ask(PLANT_IMAGE_PROMPT, Some(image)).await;
                Diagnosis::from_answer(&answer, round2(uniform(0.7, 0.95)), CONSULT_AGRONOMIST)
            }
            (DiagnosisInput::Text(description), None) => {
                let answer = self
                    .generative
                    .ask(&plant_text_prompt(description), None)
                    .await;
                Diagnosis::from_answer(&answer, round2(uniform(0.6, 0.9)), CONSULT_AGRONOMIST)
            }
        };

        info!(
            "Plant diagnosis: {} ({})",
            diagnosis.diagnosis, diagnosis.confidence
        );
        diagnosis
    }

    pub async fn diagnose_livestock(&self, query: &LivestockQuery) -> Diagnosis {
        let symptoms = query.symptoms.trim();
        let diagnosis = if symptoms.is_empty() {
            Diagnosis::no_input("Please describe the animal's symptoms")
        } else if let Some(classifier) = self.models.livestock() {
            let label = classifier.predict_label(symptoms);
            Diagnosis {
                diagnosis: label.to_string(),
                confidence: round2(uniform(0.75, 0.95)),
                treatment: livestock_treatment(label),
            }
        } else {
            let answer = self
                .generative
                .ask(&livestock_prompt(&query.animal, symptoms), None)
                .await;
            Diagnosis::from_answer(&answer, round2(uniform(0.6, 0.9)), CONSULT_VETERINARIAN)
        };

        info!(
            "Livestock diagnosis for {}: {} ({})",
            query.animal, diagnosis.diagnosis, diagnosis.confidence
        );
        diagnosis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_input_has_single_entry() {
        let diagnosis = Diagnosis::no_input("Please describe the animal's symptoms");
        assert_eq!(diagnosis.diagnosis, NO_INPUT_DIAGNOSIS);
        assert_eq!(diagnosis.confidence, 0.0);
        assert_eq!(diagnosis.treatment.len(), 1);
    }

    #[test]
    fn test_from_answer_parses_text() {
        let answer = Answer::Text("Leaf Rust\nApply fungicide\nRemove infected leaves".to_string());
        let diagnosis = Diagnosis::from_answer(&answer, 0.8, CONSULT_AGRONOMIST);

        assert_eq!(diagnosis.diagnosis, "Leaf Rust");
        assert_eq!(
            diagnosis.treatment,
            vec!["Apply fungicide".to_string(), "Remove infected leaves".to_string()]
        );
    }

    #[test]
    fn test_from_unavailable_answer_is_unknown() {
        let answer = Answer::Unavailable("timeout".to_string());
        let diagnosis = Diagnosis::from_answer(&answer, 0.7, CONSULT_VETERINARIAN);

        assert_eq!(diagnosis.diagnosis, UNKNOWN_DIAGNOSIS);
        assert_eq!(diagnosis.treatment, vec![CONSULT_VETERINARIAN.to_string()]);
    }

    #[test]
    fn test_livestock_treatment_lookup() {
        assert_eq!(livestock_treatment("Anthrax").len(), 3);
        assert_eq!(livestock_treatment("Newcastle Disease")[0], "Vaccinate poultry");
        assert_eq!(
            livestock_treatment("Lumpy Skin Disease"),
            vec![CONSULT_VETERINARIAN.to_string()]
        );
    }

    #[test]
    fn test_livestock_prompt_includes_animal_and_symptoms() {
        let prompt = livestock_prompt("goat", "coughing and nasal discharge");
        assert!(prompt.contains("this goat"));
        assert!(prompt.ends_with("Symptoms: coughing and nasal discharge"));
    }
}
