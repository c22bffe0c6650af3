use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationError, TextGenerator};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemma-3-27b-it";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Streams a completion from the Gemini API and joins the chunks.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let payload = StreamRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let mut stream = response.bytes_stream();
        let mut pending: Vec<u8> = Vec::new();
        let mut full_text = String::new();

        while let Some(bytes) = stream.next().await {
            pending.extend_from_slice(&bytes?);
            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                append_line(&line, &mut full_text)?;
            }
        }
        append_line(&pending, &mut full_text)?;

        if full_text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(full_text)
    }
}

fn append_line(line: &[u8], full_text: &mut String) -> Result<(), GenerationError> {
    let line = std::str::from_utf8(line)?;
    if let Some(text) = parse_sse_line(line)? {
        debug!("chunk received: {text}");
        full_text.push_str(&text);
    }
    Ok(())
}

/// Extract the text carried by one server-sent event line.
///
/// Lines that are not `data:` events yield `None`.
pub fn parse_sse_line(line: &str) -> Result<Option<String>, GenerationError> {
    let Some(data) = line.trim().strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(data)?;
    let text: String = chunk
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect();
    Ok(Some(text))
}

#[derive(Debug, Serialize)]
struct StreamRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use futures_util::stream;

    use super::*;
    use crate::testing::serve_stub;

    type SeenRequest = Arc<Mutex<Option<(String, String)>>>;

    /// A Gemini stub that streams `chunks` with a pause between each write.
    async fn gemini_api(chunks: Vec<&'static [u8]>) -> (GeminiConfig, SeenRequest) {
        let seen = SeenRequest::default();
        let router = Router::new()
            .fallback(move |State(seen): State<SeenRequest>, uri: Uri, headers: HeaderMap| {
                let chunks = chunks.clone();
                async move {
                    let key = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *seen.lock().unwrap() = Some((uri.to_string(), key));

                    let body = stream::iter(chunks).then(|chunk| async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, std::io::Error>(chunk)
                    });
                    Body::from_stream(body)
                }
            })
            .with_state(Arc::clone(&seen));

        let config = GeminiConfig {
            base_url: serve_stub(router).await,
            model: "test-model".to_string(),
            ..GeminiConfig::new("secret")
        };
        (config, seen)
    }

    #[test]
    fn test_data_line_text_is_joined() {
        let line = r#"data: {"candidates": [{"content": {"parts": [{"text": "{\"questions\""}, {"text": ": []}"}], "role": "model"}}]}"#;
        assert_eq!(
            parse_sse_line(line).unwrap().as_deref(),
            Some(r#"{"questions": []}"#)
        );
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        assert!(parse_sse_line("").unwrap().is_none());
        assert!(parse_sse_line(": keep-alive").unwrap().is_none());
        assert!(parse_sse_line("event: message").unwrap().is_none());
    }

    #[test]
    fn test_chunk_without_content() {
        let line = r#"data: {"candidates": [{"finishReason": "STOP"}]}"#;
        assert_eq!(parse_sse_line(line).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_garbage_data_is_an_error() {
        assert!(matches!(
            parse_sse_line("data: {not json"),
            Err(GenerationError::Chunk(_))
        ));
    }

    #[tokio::test]
    async fn test_events_split_across_reads_are_joined() {
        let (config, seen) = gemini_api(vec![
            b"data: {\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"{\\\"questions\\\": \"}]}}]}\n\ndata: {\"candidates\": [{\"con".as_slice(),
            b"tent\": {\"parts\": [{\"text\": \"[\\\"Caf\xC3".as_slice(),
            b"\xA9\\\"]}\"}]}}]}".as_slice(),
        ])
        .await;

        let text = GeminiGenerator::new(config).generate("prompt").await.unwrap();
        assert_eq!(text, "{\"questions\": [\"Caf\u{e9}\"]}");

        let (uri, key) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(uri, "/v1beta/models/test-model:streamGenerateContent?alt=sse");
        assert_eq!(key, "secret");
    }

    #[tokio::test]
    async fn test_stream_without_text_is_empty() {
        let (config, _) =
            gemini_api(vec![b"data: {\"candidates\": [{\"finishReason\": \"STOP\"}]}\n\n".as_slice()]).await;
        assert!(matches!(
            GeminiGenerator::new(config).generate("prompt").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().fallback(|| async { StatusCode::TOO_MANY_REQUESTS });
        let config = GeminiConfig {
            base_url: serve_stub(router).await,
            ..GeminiConfig::new("secret")
        };
        assert!(matches!(
            GeminiGenerator::new(config).generate("prompt").await,
            Err(GenerationError::HttpStatus(status)) if status == StatusCode::TOO_MANY_REQUESTS
        ));
    }
}
