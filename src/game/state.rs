use serde::Serialize;

/// Where the quiz currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameState {
    /// Choosing categories, difficulty and question count.
    #[default]
    Setup,
    /// Waiting for the question source.
    Loading,
    /// Answering the question at the current index.
    Playing(Turn),
    /// All questions answered.
    Finished,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Setup => "in setup",
            GameState::Loading => "loading",
            GameState::Playing(Turn::Pending { .. }) => "waiting for an answer",
            GameState::Playing(Turn::Revealed { .. }) => "showing the answer",
            GameState::Finished => "finished",
        }
    }
}

/// Progress within a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "turn", rename_all = "snake_case")]
pub enum Turn {
    /// Options are live; `selected` is the tentative choice.
    Pending { selected: Option<usize> },
    /// The correct option is shown and options are inert.
    Revealed { selected: usize },
}

impl Turn {
    pub fn selected(&self) -> Option<usize> {
        match self {
            Turn::Pending { selected } => *selected,
            Turn::Revealed { selected } => Some(*selected),
        }
    }
}

/// One answered question. Written once when the player moves past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnsweredRecord {
    pub question_index: usize,
    pub selected_option: usize,
    pub was_correct: bool,
}
