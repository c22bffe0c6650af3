use serde::{Deserialize, Serialize};

use super::{Category, Difficulty};

pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 20;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// What the player asked for on the setup screen.
///
/// Deserializing goes through [`QuizSettings::new`], so duplicates are dropped
/// and the count is clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct QuizSettings {
    categories: Vec<Category>,
    pub difficulty: Difficulty,
    question_count: usize,
}

impl QuizSettings {
    pub fn new(categories: impl IntoIterator<Item = Category>, difficulty: Difficulty, count: usize) -> Self {
        let mut settings = Self {
            difficulty,
            ..Self::default()
        };
        for category in categories {
            if !settings.categories.contains(&category) {
                settings.categories.push(category);
            }
        }
        settings.set_question_count(count);
        settings
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, category: Category) {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Set the number of questions, clamped to the supported range.
    pub fn set_question_count(&mut self, count: usize) {
        self.question_count = count.clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT);
    }
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default = "default_question_count")]
    question_count: usize,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

impl From<RawSettings> for QuizSettings {
    fn from(raw: RawSettings) -> Self {
        Self::new(raw.categories, raw.difficulty, raw.question_count)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            difficulty: Difficulty::Easy,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}
