//! Quiz lifecycle: setup, loading, playing and finished.
//!
//! [`GameSession`] is the state machine itself. [`Game`] wraps a session and
//! guards the asynchronous load step with tickets so that a late fetch result
//! can never land on a session that has since been reset.

mod controller;
mod session;
mod state;

use thiserror::Error;

pub use controller::{Game, LoadOutcome, LoadTicket};
pub use session::GameSession;
pub use state::{AnsweredRecord, GameState, Turn};

/// A rejected player action. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("Please select at least one category!")]
    NoCategories,
    #[error("Please choose an answer first.")]
    NoSelection,
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
    #[error("the answer has already been revealed")]
    AnswerLocked,
    #[error("no questions are available for this selection")]
    NoQuestions,
    #[error("cannot {action} while {state}")]
    InvalidAction {
        action: &'static str,
        state: &'static str,
    },
}
