//! Questions written by a language model, fetched through the trivia proxy.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::models::{Category, NUM_OPTIONS, Question, QuizSettings};
use crate::protocol::{GENERATE_PATH, GenerateRequest, GenerateResponse};

use super::{GeneratedQuiz, RemoteError, RemoteQuestions, parse_model_output};

pub struct GenerativeClient {
    client: Client,
    proxy_url: String,
}

impl GenerativeClient {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.into(),
        }
    }
}

#[async_trait]
impl RemoteQuestions for GenerativeClient {
    async fn fetch(&self, settings: &QuizSettings) -> Result<Vec<Question>, RemoteError> {
        let url = format!("{}{}", self.proxy_url.trim_end_matches('/'), GENERATE_PATH);
        let prompt = build_prompt(settings);
        debug!(%url, "requesting generated questions");

        let response = self
            .client
            .post(url)
            .json(&GenerateRequest { prompt })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        let quiz = parse_model_output(&body.text)?;
        let questions = into_questions(quiz, settings);
        if questions.is_empty() {
            return Err(RemoteError::Empty);
        }
        Ok(questions)
    }
}

/// The instruction sent to the model.
pub fn build_prompt(settings: &QuizSettings) -> String {
    let categories = settings
        .categories()
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Generate exactly {count} trivia questions with the following specifications:
- Categories: {categories}
- Difficulty: {difficulty}
- Format: Multiple choice with 4 options

Respond ONLY with a valid JSON object in this exact format:
{{
  "questions": [
    {{
      "question": "What is the chemical symbol for gold?",
      "options": ["Au", "Ag", "Go", "Gd"],
      "correctAnswer": 0,
      "category": "Science"
    }}
  ]
}}"#,
        count = settings.question_count(),
        difficulty = settings.difficulty,
    )
}

/// Keep generated questions that have four options and a valid answer index.
fn into_questions(quiz: GeneratedQuiz, settings: &QuizSettings) -> Vec<Question> {
    let default_category = settings
        .categories()
        .first()
        .map(|c| c.name())
        .unwrap_or(Category::General.name());

    quiz.questions
        .into_iter()
        .enumerate()
        .filter_map(|(index, generated)| {
            let options: [String; NUM_OPTIONS] = match generated.options.try_into() {
                Ok(options) => options,
                Err(options) => {
                    warn!(index, count = options.len(), "skipping generated question");
                    return None;
                }
            };
            // Unknown labels count as general knowledge.
            let category = generated
                .category
                .filter(|c| !c.trim().is_empty())
                .map_or(default_category, |c| Category::from_name(&c).name());

            let question = Question::new(generated.question, options, generated.correct_answer, category);
            if question.is_none() {
                warn!(index, answer = generated.correct_answer, "skipping generated question");
            }
            question
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use reqwest::StatusCode;

    use super::*;
    use crate::data::Catalog;
    use crate::models::Difficulty;
    use crate::proxy::{self, GenerationError, TextGenerator};
    use crate::source::QuestionSource;
    use crate::testing::serve_stub;

    /// Answers every prompt with the same text and keeps the last prompt.
    #[derive(Default)]
    struct Canned {
        text: &'static str,
        prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            *self.prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.text.to_string())
        }
    }

    fn settings() -> QuizSettings {
        QuizSettings::new([Category::Science, Category::Sports], Difficulty::Hard, 7)
    }

    #[test]
    fn test_prompt_mentions_selection() {
        let prompt = build_prompt(&settings());
        assert!(prompt.starts_with("Generate exactly 7 trivia questions"));
        assert!(prompt.contains("- Categories: Science, Sports"));
        assert!(prompt.contains("- Difficulty: hard"));
        assert!(prompt.contains(r#""correctAnswer": 0"#));
    }

    #[test]
    fn test_invalid_generated_questions_are_dropped() {
        let quiz = parse_model_output(
            r#"{"questions": [
                {"question": "ok", "options": ["a", "b", "c", "d"], "correctAnswer": 3},
                {"question": "three options", "options": ["a", "b", "c"], "correctAnswer": 0},
                {"question": "bad index", "options": ["a", "b", "c", "d"], "correctAnswer": 4, "category": "Sports"},
                {"question": "lowercase", "options": ["a", "b", "c", "d"], "correctAnswer": 0, "category": "sports"},
                {"question": "unknown", "options": ["a", "b", "c", "d"], "correctAnswer": 0, "category": "Space"}
            ]}"#,
        )
        .unwrap();

        let questions = into_questions(quiz, &settings());
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].text, "ok");
        assert_eq!(questions[0].correct_option, 3);
        assert_eq!(questions[0].category, "Science");
        assert_eq!(questions[1].category, "Sports");
        assert_eq!(questions[2].category, "General Knowledge");
    }

    #[tokio::test]
    async fn test_fetch_through_proxy() {
        let generator = Arc::new(Canned {
            text: r#"Here you go: {"questions": [{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": 2}]}"#,
            ..Canned::default()
        });
        let url = serve_stub(proxy::router(generator.clone())).await;

        let questions = GenerativeClient::new(url).fetch(&settings()).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_text(), "c");
        assert_eq!(
            generator.prompt.lock().unwrap().as_deref(),
            Some(build_prompt(&settings()).as_str())
        );
    }

    #[tokio::test]
    async fn test_unparseable_output_is_a_failure() {
        let generator = Arc::new(Canned {
            text: "I would rather not.",
            ..Canned::default()
        });
        let url = serve_stub(proxy::router(generator)).await;

        assert!(matches!(
            GenerativeClient::new(url).fetch(&settings()).await,
            Err(RemoteError::ModelOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_proxy_falls_back_to_catalog() {
        let url = serve_stub(Router::new()).await;
        let client = GenerativeClient::new(url);
        let settings = QuizSettings::new([Category::Science], Difficulty::Easy, 5);
        assert!(matches!(
            client.fetch(&settings).await,
            Err(RemoteError::HttpStatus(status)) if status == StatusCode::NOT_FOUND
        ));

        let source = QuestionSource::new(Arc::new(client), Catalog::builtin().unwrap());
        let questions = source.fetch(&settings).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q.category == "Science"));
    }
}
