use super::{ChatCompletionRequest, ChatMessage, ImagePayload, LlmClient, OpenAiClient};
use crate::config::LlmConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// Text rendered in place of an answer when the model gave none.
pub const NO_RESPONSE: &str = "No response";

/// Outcome of one generative call. Failures never surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Unavailable(String),
}

impl Answer {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Unavailable(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        self.text().unwrap_or(NO_RESPONSE)
    }
}

/// Single-shot prompt client used as the last non-random fallback tier.
pub struct GenerativeFallback {
    client: Option<Arc<dyn LlmClient>>,
    model: String,
    system_prompt: Option<String>,
}

impl GenerativeFallback {
    pub fn new(config: LlmConfig) -> Self {
        if config.api_key.trim().is_empty() {
            warn!("No LLM API key configured, generative fallback disabled");
            return Self::disabled();
        }

        let model = config.model.clone();
        let system_prompt = config.system_prompt.clone();
        Self {
            client: Some(Arc::new(OpenAiClient::new(config))),
            model,
            system_prompt,
        }
    }

    pub fn with_client(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            client: Some(client),
            model: model.into(),
            system_prompt,
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: None,
            model: String::new(),
            system_prompt: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Sends `prompt`, with `image` attached when given, and returns the first
    /// non-blank choice.
    pub async fn ask(&self, prompt: &str, image: Option<&ImagePayload>) -> Answer {
        let Some(client) = &self.client else {
            return Answer::Unavailable("generative fallback not configured".to_string());
        };

        let mut messages = Vec::new();
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(ChatMessage::system(system_prompt.clone()));
        }
        messages.push(match image {
            Some(image) => ChatMessage::user_with_image(prompt, image.clone()),
            None => ChatMessage::user(prompt),
        });

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
        };

        debug!(
            "Asking generative model (image attached: {})",
            image.is_some()
        );

        match client.create_chat_completion(request).await {
            Ok(response) => match response
                .choices
                .into_iter()
                .find(|content| !content.trim().is_empty())
            {
                Some(text) => Answer::Text(text),
                None => {
                    warn!("Generative model returned no usable content");
                    Answer::Unavailable("empty response".to_string())
                }
            },
            Err(e) => {
                warn!("Generative model call failed: {}", e);
                Answer::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_answer_text() {
        let answer = Answer::Text("42.50".to_string());
        assert_eq!(answer.text(), Some("42.50"));
        assert_eq!(answer.as_str(), "42.50");
    }

    #[test]
    fn test_unavailable_renders_sentinel() {
        let answer = Answer::Unavailable("quota exceeded".to_string());
        assert_eq!(answer.text(), None);
        assert_eq!(answer.as_str(), NO_RESPONSE);
    }

    #[test]
    fn test_blank_api_key_disables_fallback() {
        let fallback = GenerativeFallback::new(LlmConfig {
            base_url: String::new(),
            api_key: "  ".to_string(),
            model: "gemini-1.5-flash".to_string(),
            system_prompt: None,
        });
        assert!(!fallback.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_fallback_is_unavailable() {
        let answer = GenerativeFallback::disabled().ask("price?", None).await;
        assert!(matches!(answer, Answer::Unavailable(_)));
    }
}
