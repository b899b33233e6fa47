pub mod canned;
pub mod ollama;

pub use canned::CannedGenerator;
pub use ollama::OllamaGenerator;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use std::pin::Pin;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generation backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode generation response: {0}")]
    Decode(String),
    #[error("Generation timed out")]
    Timeout,
    #[error("Generation cancelled")]
    Cancelled,
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.7,
            max_tokens: 128,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Text generation backend used for every persona line.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Streams the reply as fragments. Backends without native streaming
    /// yield the whole reply as a single fragment.
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let text = self.generate(request).await?;
        Ok(Box::pin(stream::once(async move { Ok(text) })))
    }

    fn name(&self) -> &str {
        "unknown"
    }
}
