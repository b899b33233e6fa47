use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;
use tracing::debug;

use super::{FragmentStream, GenerationError, GenerationRequest, Generator};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Local Ollama backend speaking the `/api/generate` endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

impl OllamaGenerator {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Reads `OLLAMA_URL` and `MODEL_NAME`, falling back to the local defaults.
    pub fn from_env() -> Result<Self, GenerationError> {
        let base_url = std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(model, base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, request: &GenerationRequest, stream: bool) -> Result<reqwest::Response, GenerationError> {
        let body = GenerateBody {
            model: &self.model,
            system: &request.system_prompt,
            prompt: &request.user_prompt,
            stream,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self.post(request, false).await?;
        let chunk: GenerateChunk = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        Ok(chunk.response.trim().to_string())
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let response = self.post(request, true).await?;
        let bytes = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))),
        );
        Ok(ndjson_fragments(BufReader::new(StreamReader::new(bytes))))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Http(error)
    }
}

/// Turns newline-delimited generate chunks into text fragments. The stream
/// ends at the first chunk flagged `done` or at end of input; undecodable
/// lines are skipped.
pub(crate) fn ndjson_fragments<R>(reader: R) -> FragmentStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let lines = reader.lines();
    Box::pin(stream::unfold((lines, false), |(mut lines, finished)| async move {
        if finished {
            return None;
        }
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let chunk: GenerateChunk = match serde_json::from_str(line) {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            debug!(error = %e, "skipping undecodable stream line");
                            continue;
                        }
                    };
                    if chunk.done {
                        if chunk.response.is_empty() {
                            return None;
                        }
                        return Some((Ok(chunk.response), (lines, true)));
                    }
                    if !chunk.response.is_empty() {
                        return Some((Ok(chunk.response), (lines, false)));
                    }
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(GenerationError::Decode(e.to_string())), (lines, true))),
            }
        }
    }))
}
