use tracing::{info, warn};

use crate::models::{Category, Difficulty, Question, QuizSettings};
use crate::source::SourceError;

use super::{GameError, GameSession, GameState};

/// Identifies one outstanding load.
///
/// Only the ticket handed out by the most recent [`Game::start`] is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The session is now playing with this many questions.
    Playing(usize),
    /// Nothing could be loaded; the session is back in setup.
    Unavailable(String),
    /// The ticket no longer matches; the result was dropped.
    Stale,
}

/// Owns the single [`GameSession`] and sequences its asynchronous load step.
#[derive(Debug, Default)]
pub struct Game {
    session: GameSession,
    issued: u64,
    outstanding: Option<u64>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view for rendering.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn toggle_category(&mut self, category: Category) -> Result<(), GameError> {
        self.session.toggle_category(category)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.session.set_difficulty(difficulty)
    }

    pub fn set_question_count(&mut self, count: usize) -> Result<(), GameError> {
        self.session.set_question_count(count)
    }

    /// Move to loading and hand out the ticket the fetch result must carry.
    pub fn start(&mut self) -> Result<(LoadTicket, QuizSettings), GameError> {
        self.session.start()?;
        self.issued += 1;
        self.outstanding = Some(self.issued);

        let settings = self.session.settings().clone();
        info!(
            ticket = self.issued,
            categories = ?settings.categories(),
            difficulty = %settings.difficulty,
            count = settings.question_count(),
            "loading questions"
        );
        Ok((LoadTicket(self.issued), settings))
    }

    /// Apply a fetch result if it belongs to the current load.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, SourceError>,
    ) -> LoadOutcome {
        if self.outstanding != Some(ticket.0) {
            warn!(ticket = ticket.0, "discarding stale question load");
            return LoadOutcome::Stale;
        }
        self.outstanding = None;

        let outcome = match result {
            Ok(questions) => match self.session.load(questions) {
                Ok(()) => LoadOutcome::Playing(self.session.total_questions()),
                Err(err) => LoadOutcome::Unavailable(err.to_string()),
            },
            Err(err) => {
                // Loading is the only state an outstanding ticket can exist in.
                let _ = self.session.fail_loading();
                LoadOutcome::Unavailable(err.to_string())
            }
        };

        match &outcome {
            LoadOutcome::Playing(count) => info!(count, "quiz started"),
            LoadOutcome::Unavailable(reason) => warn!(%reason, "no questions available"),
            LoadOutcome::Stale => {}
        }
        outcome
    }

    pub fn select(&mut self, option: usize) -> Result<(), GameError> {
        self.session.select(option)
    }

    pub fn check(&mut self) -> Result<(), GameError> {
        self.session.check()
    }

    pub fn advance(&mut self) -> Result<(), GameError> {
        self.session.advance()?;
        if self.session.state() == GameState::Finished {
            info!(
                score = self.session.score(),
                total = self.session.total_questions(),
                "quiz finished"
            );
        }
        Ok(())
    }

    pub fn answer(&mut self, option: usize) -> Result<(), GameError> {
        self.session.select(option)?;
        self.advance()
    }

    /// Start over. Any load still in flight is invalidated.
    pub fn reset(&mut self) {
        self.session.reset();
        self.outstanding = None;
    }
}
