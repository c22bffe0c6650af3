//! HTTP front of the proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::protocol::{
    ErrorResponse, GENERATE_PATH, GENERATION_FAILED, GenerateRequest, GenerateResponse,
};

use super::TextGenerator;

#[derive(Clone)]
struct ProxyState {
    generator: Arc<dyn TextGenerator>,
}

/// Routes for the proxy. Methods other than `POST` get an empty 405.
pub fn router(generator: Arc<dyn TextGenerator>) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_trivia))
        .with_state(ProxyState { generator })
}

/// Serve the proxy until the process is stopped.
pub async fn run(address: SocketAddr, generator: Arc<dyn TextGenerator>) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("proxy listening on {}", listener.local_addr()?);
    axum::serve(listener, router(generator)).await
}

async fn generate_trivia(
    State(state): State<ProxyState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    debug!(prompt_len = body.prompt.len(), "generating trivia");

    match state.generator.generate(&body.prompt).await {
        Ok(text) => {
            debug!("full text: {text}");
            (StatusCode::OK, Json(GenerateResponse { text })).into_response()
        }
        Err(e) => {
            error!("error generating content: {e}");
            let body = ErrorResponse {
                error: GENERATION_FAILED.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
