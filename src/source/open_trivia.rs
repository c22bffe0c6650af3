//! Client for the Open Trivia DB API.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::{Category, NUM_OPTIONS, Question, QuizSettings};

use super::{RemoteError, RemoteQuestions};

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// Raw API response. Every string is RFC 3986 percent-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct TriviaResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<TriviaItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriviaItem {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

pub struct OpenTriviaClient {
    client: Client,
    base_url: String,
    rng: Mutex<StdRng>,
}

impl OpenTriviaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_rng(base_url, StdRng::from_os_rng())
    }

    pub fn with_rng(base_url: impl Into<String>, rng: StdRng) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            rng: Mutex::new(rng),
        }
    }

    fn rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for OpenTriviaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RemoteQuestions for OpenTriviaClient {
    async fn fetch(&self, settings: &QuizSettings) -> Result<Vec<Question>, RemoteError> {
        // The API only accepts one category per request.
        let category = settings
            .categories()
            .choose(&mut *self.rng())
            .copied()
            .unwrap_or(Category::General);

        let url = format!("{}/api.php", self.base_url.trim_end_matches('/'));
        let query = [
            ("amount", settings.question_count().to_string()),
            ("category", category.provider_id().to_string()),
            ("difficulty", settings.difficulty.as_str().to_string()),
            ("type", "multiple".to_string()),
            ("encode", "url3986".to_string()),
        ];
        debug!(%url, %category, "requesting trivia questions");

        let response = self.client.get(url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }

        let body: TriviaResponse = response.json().await?;
        if body.response_code != 0 {
            return Err(RemoteError::ResponseCode(body.response_code));
        }
        if body.results.is_empty() {
            return Err(RemoteError::Empty);
        }

        let mut rng = self.rng();
        let mut questions = Vec::with_capacity(body.results.len());
        for item in &body.results {
            if let Some(question) = normalize_item(item, category, &mut *rng)? {
                questions.push(question);
            }
        }
        if questions.is_empty() {
            return Err(RemoteError::Empty);
        }
        Ok(questions)
    }
}

/// Decode an item and shuffle its answers into a [`Question`].
///
/// Items without exactly three incorrect answers are skipped.
pub fn normalize_item<R: Rng + ?Sized>(
    item: &TriviaItem,
    category: Category,
    rng: &mut R,
) -> Result<Option<Question>, RemoteError> {
    if item.incorrect_answers.len() != NUM_OPTIONS - 1 {
        return Ok(None);
    }

    let text = decode(&item.question)?;
    let mut candidates = Vec::with_capacity(NUM_OPTIONS);
    candidates.push(decode(&item.correct_answer)?);
    for answer in &item.incorrect_answers {
        candidates.push(decode(answer)?);
    }

    // Shuffle positions rather than strings so duplicate answers cannot
    // confuse where the correct one went.
    let mut order: [usize; NUM_OPTIONS] = [0, 1, 2, 3];
    order.shuffle(rng);
    let correct_option = order.iter().position(|&i| i == 0).unwrap_or(0);
    let options = order.map(|i| candidates[i].clone());

    Ok(Question::new(text, options, correct_option, category.name()))
}

fn decode(value: &str) -> Result<String, RemoteError> {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RemoteError::Decode(value.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{RawQuery, State};
    use axum::routing::get;
    use axum::{Json, Router};
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::data::Catalog;
    use crate::models::Difficulty;
    use crate::source::QuestionSource;
    use crate::testing::serve_stub;

    type SeenQuery = Arc<Mutex<Option<String>>>;

    /// An API stub that answers every request with `body` and remembers the query.
    async fn trivia_api(body: Value) -> (String, SeenQuery) {
        let seen = SeenQuery::default();
        let router = Router::new()
            .route(
                "/api.php",
                get(move |State(seen): State<SeenQuery>, RawQuery(query): RawQuery| {
                    let body = body.clone();
                    async move {
                        *seen.lock().unwrap() = query;
                        Json(body)
                    }
                }),
            )
            .with_state(Arc::clone(&seen));
        (serve_stub(router).await, seen)
    }

    fn science() -> QuizSettings {
        QuizSettings::new([Category::Science], Difficulty::Easy, 5)
    }

    fn item() -> TriviaItem {
        TriviaItem {
            question: "What%20is%20the%20capital%20of%20France%3F".to_string(),
            correct_answer: "Paris".to_string(),
            incorrect_answers: vec![
                "Lyon".to_string(),
                "Marseille".to_string(),
                "Saint-%C3%89tienne".to_string(),
            ],
        }
    }

    #[test]
    fn test_normalized_options_are_a_permutation() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = normalize_item(&item(), Category::Geography, &mut rng)
                .unwrap()
                .unwrap();

            assert_eq!(question.text, "What is the capital of France?");
            assert_eq!(question.correct_text(), "Paris");
            assert_eq!(question.category, "Geography");

            let mut options = question.options.to_vec();
            options.sort();
            assert_eq!(options, ["Lyon", "Marseille", "Paris", "Saint-Étienne"]);
        }
    }

    #[test]
    fn test_correct_answer_moves_around() {
        let positions: std::collections::HashSet<usize> = (0..64)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                normalize_item(&item(), Category::Geography, &mut rng)
                    .unwrap()
                    .unwrap()
                    .correct_option
            })
            .collect();
        assert_eq!(positions.len(), NUM_OPTIONS);
    }

    #[test]
    fn test_skips_items_without_three_distractors() {
        let mut short = item();
        short.incorrect_answers.pop();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(normalize_item(&short, Category::Geography, &mut rng).unwrap().is_none());
    }

    #[test]
    fn test_invalid_encoding_is_an_error() {
        let mut broken = item();
        broken.correct_answer = "%FF%FE".to_string();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            normalize_item(&broken, Category::Geography, &mut rng),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn test_response_without_results() {
        let body: TriviaResponse = serde_json::from_str(r#"{"response_code": 1}"#).unwrap();
        assert_eq!(body.response_code, 1);
        assert!(body.results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_decodes() {
        let (url, seen) = trivia_api(json!({
            "response_code": 0,
            "results": [{
                "question": "Which%20one%3F",
                "correct_answer": "A%20b",
                "incorrect_answers": ["c", "d", "e"]
            }]
        }))
        .await;
        let client = OpenTriviaClient::with_rng(url, StdRng::seed_from_u64(3));

        let questions = client.fetch(&science()).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Which one?");
        assert_eq!(questions[0].correct_text(), "A b");
        assert_eq!(questions[0].category, "Science");
        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some("amount=5&category=17&difficulty=easy&type=multiple&encode=url3986")
        );
    }

    #[tokio::test]
    async fn test_nonzero_response_code_fails() {
        let (url, _) = trivia_api(json!({ "response_code": 1 })).await;
        let client = OpenTriviaClient::new(url);
        assert!(matches!(
            client.fetch(&science()).await,
            Err(RemoteError::ResponseCode(1))
        ));
    }

    #[tokio::test]
    async fn test_empty_results_fail() {
        let (url, _) = trivia_api(json!({ "response_code": 0, "results": [] })).await;
        let client = OpenTriviaClient::new(url);
        assert!(matches!(client.fetch(&science()).await, Err(RemoteError::Empty)));
    }

    #[tokio::test]
    async fn test_error_status_falls_back_to_catalog() {
        let url = serve_stub(Router::new()).await;
        let client = OpenTriviaClient::new(url);
        assert!(matches!(
            client.fetch(&science()).await,
            Err(RemoteError::HttpStatus(status)) if status == StatusCode::NOT_FOUND
        ));

        let source = QuestionSource::with_rng(
            Arc::new(client),
            Catalog::builtin().unwrap(),
            StdRng::seed_from_u64(9),
        );
        let questions = source.fetch(&science()).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q.category == "Science"));
    }
}
