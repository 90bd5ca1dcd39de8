mod client;
mod generative;
mod types;

pub use client::{LlmClient, OpenAiClient};
pub use generative::{Answer, GenerativeFallback, NO_RESPONSE};
pub use types::*;
