use serde::Serialize;

use crate::models::{Category, Difficulty, Question, QuizSettings, NUM_OPTIONS};

use super::{AnsweredRecord, GameError, GameState, Turn};

/// The full state of one quiz attempt.
///
/// Every method either applies a complete transition or returns a
/// [`GameError`] without touching anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameSession {
    state: GameState,
    settings: QuizSettings,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answers: Vec<AnsweredRecord>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnsweredRecord] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question being answered, if a quiz is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            GameState::Playing(_) => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn turn(&self) -> Option<Turn> {
        match self.state {
            GameState::Playing(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn toggle_category(&mut self, category: Category) -> Result<(), GameError> {
        self.require_setup("change categories")?;
        self.settings.toggle_category(category);
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.require_setup("change difficulty")?;
        self.settings.difficulty = difficulty;
        Ok(())
    }

    pub fn set_question_count(&mut self, count: usize) -> Result<(), GameError> {
        self.require_setup("change the question count")?;
        self.settings.set_question_count(count);
        Ok(())
    }

    /// Leave setup and wait for questions.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require_setup("start")?;
        if self.settings.categories().is_empty() {
            return Err(GameError::NoCategories);
        }
        self.state = GameState::Loading;
        Ok(())
    }

    /// Begin playing with the fetched questions.
    ///
    /// An empty list sends the session back to setup and reports
    /// [`GameError::NoQuestions`].
    pub fn load(&mut self, mut questions: Vec<Question>) -> Result<(), GameError> {
        if self.state != GameState::Loading {
            return Err(self.invalid("load questions"));
        }
        if questions.is_empty() {
            self.state = GameState::Setup;
            return Err(GameError::NoQuestions);
        }

        questions.truncate(self.settings.question_count());
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.state = GameState::Playing(Turn::Pending { selected: None });
        Ok(())
    }

    /// Abandon loading and return to setup, keeping the chosen settings.
    pub fn fail_loading(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Loading {
            return Err(self.invalid("cancel loading"));
        }
        self.state = GameState::Setup;
        Ok(())
    }

    /// Tentatively choose an option for the current question.
    pub fn select(&mut self, option: usize) -> Result<(), GameError> {
        match self.state {
            GameState::Playing(Turn::Pending { .. }) if option >= NUM_OPTIONS => {
                Err(GameError::OptionOutOfRange(option))
            }
            GameState::Playing(Turn::Pending { .. }) => {
                self.state = GameState::Playing(Turn::Pending {
                    selected: Some(option),
                });
                Ok(())
            }
            GameState::Playing(Turn::Revealed { .. }) => Err(GameError::AnswerLocked),
            _ => Err(self.invalid("select an option")),
        }
    }

    /// Reveal the correct option. Nothing is recorded until [`advance`](Self::advance).
    pub fn check(&mut self) -> Result<(), GameError> {
        match self.state {
            GameState::Playing(Turn::Pending { selected: Some(selected) }) => {
                self.state = GameState::Playing(Turn::Revealed { selected });
                Ok(())
            }
            GameState::Playing(Turn::Pending { selected: None }) => Err(GameError::NoSelection),
            _ => Err(self.invalid("check the answer")),
        }
    }

    /// Record the selected option and move to the next question or finish.
    ///
    /// Accepted after a reveal, or directly from a pending question that has
    /// a selection.
    pub fn advance(&mut self) -> Result<(), GameError> {
        let selected = match self.state {
            GameState::Playing(Turn::Pending { selected: None }) => {
                return Err(GameError::NoSelection);
            }
            GameState::Playing(turn) => turn.selected(),
            _ => None,
        };
        let Some(selected) = selected else {
            return Err(self.invalid("advance"));
        };
        let Some(question) = self.questions.get(self.current_index) else {
            return Err(self.invalid("advance"));
        };

        let was_correct = question.is_correct(selected);
        self.answers.push(AnsweredRecord {
            question_index: self.current_index,
            selected_option: selected,
            was_correct,
        });
        if was_correct {
            self.score += 1;
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.state = GameState::Playing(Turn::Pending { selected: None });
        } else {
            self.state = GameState::Finished;
        }
        Ok(())
    }

    /// Single-click answering: select, record and move on in one step.
    pub fn answer(&mut self, option: usize) -> Result<(), GameError> {
        if let GameState::Playing(Turn::Revealed { .. }) = self.state {
            return Err(GameError::AnswerLocked);
        }
        self.select(option)?;
        self.advance()
    }

    /// Throw the session away and start over with default settings.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn require_setup(&self, action: &'static str) -> Result<(), GameError> {
        if self.state == GameState::Setup {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidAction {
            action,
            state: self.state.name(),
        }
    }
}
