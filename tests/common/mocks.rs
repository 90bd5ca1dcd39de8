use async_trait::async_trait;
use farmtrust_ai::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatCompletionResponse, LlmClient},
    reference::ReferenceSource,
};
use std::sync::{Arc, Mutex};

/// Mock LLM client for testing
#[derive(Debug)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    /// Client that answers every request once with `text`, in order.
    pub fn with_texts(texts: &[&str]) -> Self {
        let client = Self::new();
        for text in texts {
            client.add_response(text_response(text));
        }
        client
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn add_response(&self, response: ChatCompletionResponse) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn text_response(text: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        choices: vec![text.to_string()],
    }
}

/// Mock price reference returning a fixed baseline
#[derive(Debug, Default)]
pub struct MockReference {
    pub baseline: Option<f64>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockReference {
    pub fn with_baseline(baseline: f64) -> Self {
        Self {
            baseline: Some(baseline),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceSource for MockReference {
    async fn fetch_baseline(&self, commodity: &str, region: &str) -> Option<f64> {
        self.calls
            .lock()
            .unwrap()
            .push((commodity.to_string(), region.to_string()));
        self.baseline
    }
}
