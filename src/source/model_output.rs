//! Parsing free-form model output into questions.
//!
//! The model is asked for a bare JSON object but often wraps it in prose or
//! a code fence. Parsing is strict first; failing that, the first balanced
//! `{...}` block is extracted and parsed.

use serde::Deserialize;
use thiserror::Error;

/// How far past the first `{` the brace scan is allowed to look.
pub const MAX_SCAN_BYTES: usize = 256 * 1024;

#[derive(Debug, Error)]
pub enum ModelOutputError {
    #[error("model output is JSON but not a question list: {0}")]
    Strict(#[source] serde_json::Error),
    #[error("no JSON object found in model output")]
    NoObject,
    #[error("JSON object in model output is never closed")]
    Unbalanced,
    #[error("model output is not a valid question list: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedQuiz {
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    #[serde(default)]
    pub category: Option<String>,
}

pub fn parse_model_output(text: &str) -> Result<GeneratedQuiz, ModelOutputError> {
    let trimmed = text.trim();
    let strict = match serde_json::from_str(trimmed) {
        Ok(quiz) => return Ok(quiz),
        Err(err) => err,
    };

    let block = first_object(text)?;
    if block == trimmed {
        // The scan found the whole text, so the strict error already says why.
        return Err(ModelOutputError::Strict(strict));
    }
    serde_json::from_str(block).map_err(ModelOutputError::Malformed)
}

/// The first balanced top-level object in `text`, skipping braces inside
/// string literals.
fn first_object(text: &str) -> Result<&str, ModelOutputError> {
    let start = text.find('{').ok_or(ModelOutputError::NoObject)?;
    let rest = &text[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in rest.char_indices() {
        if offset >= MAX_SCAN_BYTES {
            break;
        }
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&rest[..offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(ModelOutputError::Unbalanced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ: &str = r#"{
  "questions": [
    {
      "question": "What is the chemical symbol for gold?",
      "options": ["Au", "Ag", "Go", "Gd"],
      "correctAnswer": 0,
      "category": "Science"
    }
  ]
}"#;

    #[test]
    fn test_strict_json() {
        let quiz = parse_model_output(QUIZ).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_answer, 0);
        assert_eq!(quiz.questions[0].category.as_deref(), Some("Science"));
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let text = format!("Sure! Here are your questions:\n```json\n{QUIZ}\n```\nEnjoy {{the}} game.");
        let quiz = parse_model_output(&text).unwrap();
        assert_eq!(quiz.questions[0].options[0], "Au");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"note: {"questions": [{"question": "Which bracket is } ?", "options": ["a", "b", "c", "d\"}"], "correctAnswer": 1}]} trailing }"#;
        let quiz = parse_model_output(text).unwrap();
        assert_eq!(quiz.questions[0].question, "Which bracket is } ?");
        assert_eq!(quiz.questions[0].category, None);
    }

    #[test]
    fn test_failure_kinds() {
        assert!(matches!(
            parse_model_output("I cannot help with that."),
            Err(ModelOutputError::NoObject)
        ));
        assert!(matches!(
            parse_model_output(r#"here: {"questions": ["#),
            Err(ModelOutputError::Unbalanced)
        ));
        assert!(matches!(
            parse_model_output(r#"here: {"answers": []} done"#),
            Err(ModelOutputError::Malformed(_))
        ));
    }

    #[test]
    fn test_bare_json_of_wrong_shape_keeps_strict_error() {
        match parse_model_output(r#"  {"questions": [{"question": "no options"}]}  "#) {
            Err(ModelOutputError::Strict(source)) => assert!(source.to_string().contains("options")),
            other => panic!("expected the strict stage to fail, got {other:?}"),
        }
    }
}
