use serde::{Deserialize, Serialize};

/// Every question is multiple choice with exactly this many options.
pub const NUM_OPTIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; NUM_OPTIONS],
    pub correct_option: usize,
    pub category: String,
}

impl Question {
    /// Build a question, returning `None` when `correct_option` does not index `options`.
    pub fn new(
        text: impl Into<String>,
        options: [String; NUM_OPTIONS],
        correct_option: usize,
        category: impl Into<String>,
    ) -> Option<Self> {
        if correct_option >= NUM_OPTIONS {
            return None;
        }

        Some(Self {
            text: text.into(),
            options,
            correct_option,
            category: category.into(),
        })
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }

    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["Au", "Ag", "Go", "Gd"].map(String::from)
    }

    #[test]
    fn test_rejects_out_of_range_answer() {
        assert!(Question::new("Gold?", options(), 4, "Science").is_none());

        let question = Question::new("Gold?", options(), 0, "Science").unwrap();
        assert!(question.is_correct(0));
        assert!(!question.is_correct(1));
        assert_eq!(question.correct_text(), "Au");
    }

    #[test]
    fn test_catalog_shape_deserializes() {
        let json = r#"{
            "text": "What is the chemical symbol for gold?",
            "options": ["Au", "Ag", "Go", "Gd"],
            "correct_option": 0,
            "category": "Science"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.options[0], "Au");
        assert_eq!(question.category, "Science");
    }
}
