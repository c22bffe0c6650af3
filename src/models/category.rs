//! Quiz categories and difficulty levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A question category.
///
/// Each category maps to a fixed Open Trivia DB category id. Names that do not
/// match a known category fall back to [`Category::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Science,
    History,
    Geography,
    Sports,
    Technology,
    General,
}

impl Category {
    /// Categories offered on the setup screen, in display order.
    pub const SELECTABLE: [Category; 5] = [
        Category::Science,
        Category::History,
        Category::Geography,
        Category::Sports,
        Category::Technology,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Science => "Science",
            Category::History => "History",
            Category::Geography => "Geography",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
            Category::General => "General Knowledge",
        }
    }

    /// Look up a category by its display name, ignoring case.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::SELECTABLE
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
            .unwrap_or(Category::General)
    }

    /// Open Trivia DB category id.
    pub fn provider_id(self) -> u32 {
        match self {
            Category::Science => 17,
            Category::History => 23,
            Category::Geography => 22,
            Category::Sports => 21,
            Category::Technology => 18,
            Category::General => 9,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
