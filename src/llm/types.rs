use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    ImageDetail, ImageUrlArgs,
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Raw uploaded image plus the MIME type it was sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Text content of each returned choice, in order.
#[derive(Debug, Clone)]
pub struct ChatCompletionResponse {
    pub choices: Vec<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            image: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            image: None,
        }
    }

    pub fn user_with_image(content: impl Into<String>, image: ImagePayload) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            image: Some(image),
        }
    }

    pub fn to_openai_message(&self) -> Result<ChatCompletionRequestMessage, crate::Error> {
        match self.role.as_str() {
            "system" => {
                let msg = ChatCompletionRequestSystemMessageArgs::default()
                    .content(ChatCompletionRequestSystemMessageContent::Text(
                        self.content.clone(),
                    ))
                    .build()
                    .map_err(|e| {
                        crate::Error::llm(format!("Failed to build system message: {}", e))
                    })?;
                Ok(msg.into())
            }
            "user" => {
                let content = match &self.image {
                    None => ChatCompletionRequestUserMessageContent::Text(self.content.clone()),
                    Some(image) => ChatCompletionRequestUserMessageContent::Array(
                        self.multimodal_parts(image)?,
                    ),
                };
                let msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(content)
                    .build()
                    .map_err(|e| {
                        crate::Error::llm(format!("Failed to build user message: {}", e))
                    })?;
                Ok(msg.into())
            }
            _ => Err(crate::Error::llm(format!(
                "Unknown message role: {}",
                self.role
            ))),
        }
    }

    fn multimodal_parts(
        &self,
        image: &ImagePayload,
    ) -> Result<Vec<ChatCompletionRequestUserMessageContentPart>, crate::Error> {
        let text = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(self.content.clone())
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build text part: {}", e)))?;

        let image_url = ImageUrlArgs::default()
            .url(image.to_data_url())
            .detail(ImageDetail::Auto)
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build image url: {}", e)))?;
        let image = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(image_url)
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build image part: {}", e)))?;

        Ok(vec![
            ChatCompletionRequestUserMessageContentPart::Text(text),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(image),
        ])
    }
}
