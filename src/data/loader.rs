//! The fallback question catalog.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::models::{Category, NUM_OPTIONS, Question};

const BUILTIN_CATALOG: &str = include_str!("fallback_questions.json");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog must contain at least one question")]
    Empty,
    #[error("question {index} has no option {correct_option}")]
    InvalidAnswer { index: usize, correct_option: usize },
}

/// Statically bundled questions used when the remote source is unavailable.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file holding an array of questions.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        if let Some((index, question)) = questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.correct_option >= NUM_OPTIONS)
        {
            return Err(LoadError::InvalidAnswer {
                index,
                correct_option: question.correct_option,
            });
        }

        Ok(Self { questions })
    }

    /// A catalog with nothing in it. Drawing from it always yields nothing.
    pub fn empty() -> Self {
        Self {
            questions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions whose category is one of `categories`.
    pub fn matching(&self, categories: &[Category]) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| categories.contains(&Category::from_name(&q.category)))
            .collect()
    }

    /// Pick up to `count` shuffled questions for the given categories.
    ///
    /// When no question matches, the whole catalog is used instead.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        categories: &[Category],
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut pool = self.matching(categories);
        if pool.is_empty() {
            pool = self.questions.iter().collect();
        }

        pool.shuffle(rng);
        pool.into_iter().take(count).cloned().collect()
    }
}
