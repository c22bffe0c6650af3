//! Trivia generation proxy.
//!
//! Forwards prompts to a generative text provider so the API key never
//! leaves the server.

mod gemini;
mod server;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{DEFAULT_GEMINI_URL, DEFAULT_MODEL, GeminiConfig, GeminiGenerator, parse_sse_line};
pub use server::{router, run};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("could not parse stream chunk: {0}")]
    Chunk(#[from] serde_json::Error),
    #[error("stream is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// Turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
