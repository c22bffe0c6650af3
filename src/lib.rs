//! # trivia-quiz
//!
//! A terminal multiple-choice trivia game, plus the small HTTP proxy that
//! lets it ask a language model for questions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use trivia_quiz::data::Catalog;
//! use trivia_quiz::source::{OpenTriviaClient, QuestionSource};
//! use trivia_quiz::{Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Ask Open Trivia DB first and fall back to the bundled questions
//!     let source = QuestionSource::new(Arc::new(OpenTriviaClient::default()), Catalog::builtin()?);
//!
//!     // Run the quiz in the terminal
//!     Quiz::new(source).run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod data;
pub mod game;
pub mod models;
pub mod protocol;
pub mod proxy;
pub mod source;
pub mod terminal;
#[cfg(test)]
mod testing;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{App, Command};
pub use data::{Catalog, LoadError};
pub use game::{AnsweredRecord, Game, GameError, GameSession, GameState, Turn};
pub use models::{Category, Difficulty, Question, QuizSettings};

use game::LoadTicket;
use source::{QuestionSource, SourceError};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading the fallback catalog.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

type LoadResult = (LoadTicket, Result<Vec<Question>, SourceError>);

/// A quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
    source: Arc<QuestionSource>,
}

impl Quiz {
    pub fn new(source: QuestionSource) -> Self {
        Self {
            app: App::new(),
            source: Arc::new(source),
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// This takes over the terminal and returns when the player quits.
    /// Must be called from within a tokio runtime; question loads run as
    /// spawned tasks.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &self.source).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    source: &Arc<QuestionSource>,
) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<LoadResult>();

    loop {
        while let Ok((ticket, result)) = rx.try_recv() {
            app.finish_loading(ticket, result);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(app, key.code) {
            Input::Quit => break,
            Input::Run(Command::Load(ticket, settings)) => {
                let source = Arc::clone(source);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = source.fetch(&settings).await;
                    // The receiver is gone once the player has quit.
                    let _ = tx.send((ticket, result));
                });
            }
            Input::Handled => {}
        }
    }

    Ok(())
}

enum Input {
    Handled,
    Run(Command),
    Quit,
}

fn handle_input(app: &mut App, key: KeyCode) -> Input {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        return Input::Quit;
    }

    match app.state() {
        GameState::Setup => handle_setup_input(app, key),
        GameState::Loading => Input::Handled,
        GameState::Playing(_) => {
            handle_quiz_input(app, key);
            Input::Handled
        }
        GameState::Finished => {
            handle_result_input(app, key);
            Input::Handled
        }
    }
}

fn handle_setup_input(app: &mut App, key: KeyCode) -> Input {
    match key {
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.toggle_category(Category::SELECTABLE[index]);
        }
        KeyCode::Char('d') | KeyCode::Char('D') => app.cycle_difficulty(),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => app.increase_question_count(),
        KeyCode::Char('-') | KeyCode::Left => app.decrease_question_count(),
        KeyCode::Enter => {
            if let Some(command) = app.start_quiz() {
                return Input::Run(command);
            }
        }
        _ => {}
    }
    Input::Handled
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ 'a'..='d') => app.select_option(c as usize - 'a' as usize),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => {}
    }
}
