//! Wire types for the trivia generation proxy.
//!
//! All bodies are JSON.

use serde::{Deserialize, Serialize};

/// Route served by the proxy.
pub const GENERATE_PATH: &str = "/api/generateTrivia";

/// Body returned with a 500 when generation fails.
pub const GENERATION_FAILED: &str = "Failed to generate questions";

/// Request sent to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Raw model output. It may contain a JSON object embedded in other text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
