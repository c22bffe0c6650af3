//! Where questions come from.
//!
//! A [`QuestionSource`] asks a [`RemoteQuestions`] implementation first and
//! falls back to the bundled [`Catalog`] whenever the remote fails for any
//! reason. Only an empty fallback is reported to the caller.

mod generative;
mod model_output;
mod open_trivia;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::Catalog;
use crate::models::{Question, QuizSettings};

pub use generative::{GenerativeClient, build_prompt};
pub use model_output::{
    GeneratedQuestion, GeneratedQuiz, MAX_SCAN_BYTES, ModelOutputError, parse_model_output,
};
pub use open_trivia::{OpenTriviaClient, TriviaItem, TriviaResponse, normalize_item};

/// Why a remote fetch produced nothing usable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("remote source is disabled")]
    Disabled,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("trivia API returned response code {0}")]
    ResponseCode(u8),
    #[error("remote returned no questions")]
    Empty,
    #[error("could not decode {0:?}")]
    Decode(String),
    #[error(transparent)]
    ModelOutput(#[from] ModelOutputError),
}

/// Neither the remote nor the fallback produced a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Failed to generate questions. Please try again.")]
    Exhausted,
}

/// A remote provider of ready-made questions.
#[async_trait]
pub trait RemoteQuestions: Send + Sync {
    async fn fetch(&self, settings: &QuizSettings) -> Result<Vec<Question>, RemoteError>;
}

/// A remote that never answers. Playing offline goes straight to the catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl RemoteQuestions for Offline {
    async fn fetch(&self, _settings: &QuizSettings) -> Result<Vec<Question>, RemoteError> {
        Err(RemoteError::Disabled)
    }
}

pub struct QuestionSource {
    remote: Arc<dyn RemoteQuestions>,
    catalog: Catalog,
    rng: Mutex<StdRng>,
}

impl QuestionSource {
    pub fn new(remote: Arc<dyn RemoteQuestions>, catalog: Catalog) -> Self {
        Self::with_rng(remote, catalog, StdRng::from_os_rng())
    }

    /// Use a specific RNG for the fallback shuffle.
    pub fn with_rng(remote: Arc<dyn RemoteQuestions>, catalog: Catalog, rng: StdRng) -> Self {
        Self {
            remote,
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Produce up to `settings.question_count()` questions.
    pub async fn fetch(&self, settings: &QuizSettings) -> Result<Vec<Question>, SourceError> {
        let count = settings.question_count();

        match self.remote.fetch(settings).await {
            Ok(mut questions) if !questions.is_empty() => {
                questions.truncate(count);
                info!(count = questions.len(), "loaded questions from remote");
                return Ok(questions);
            }
            Ok(_) => warn!("remote returned no questions, using fallback catalog"),
            Err(err) => warn!(error = %err, "remote fetch failed, using fallback catalog"),
        }

        let questions = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.catalog.draw(settings.categories(), count, &mut *rng)
        };
        if questions.is_empty() {
            return Err(SourceError::Exhausted);
        }

        info!(count = questions.len(), "loaded questions from fallback catalog");
        Ok(questions)
    }
}
