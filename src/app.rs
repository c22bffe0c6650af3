use crate::game::{Game, GameError, GameSession, GameState, LoadOutcome, LoadTicket, Turn};
use crate::models::{Category, NUM_OPTIONS, Question, QuizSettings};
use crate::source::SourceError;

/// Something the event loop has to do on the app's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch questions and report back with this ticket.
    Load(LoadTicket, QuizSettings),
}

/// Terminal controller: owns the game and the bits of view state around it.
pub struct App {
    game: Game,
    cursor: usize,
    result_scroll: usize,
    notice: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            game: Game::new(),
            cursor: 0,
            result_scroll: 0,
            notice: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        self.game.session()
    }

    pub fn state(&self) -> GameState {
        self.game.session().state()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.game.session().current_question()
    }

    pub fn current_question_number(&self) -> usize {
        self.game.session().current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.game.session().total_questions()
    }

    /// Highlighted option on the quiz screen.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Message for the player, such as a rejected action.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn toggle_category(&mut self, category: Category) {
        let result = self.game.toggle_category(category);
        self.report(result);
    }

    pub fn cycle_difficulty(&mut self) {
        let next = self.game.session().settings().difficulty.next();
        let result = self.game.set_difficulty(next);
        self.report(result);
    }

    pub fn increase_question_count(&mut self) {
        let count = self.game.session().settings().question_count() + 1;
        let result = self.game.set_question_count(count);
        self.report(result);
    }

    pub fn decrease_question_count(&mut self) {
        let count = self.game.session().settings().question_count().saturating_sub(1);
        let result = self.game.set_question_count(count);
        self.report(result);
    }

    pub fn start_quiz(&mut self) -> Option<Command> {
        match self.game.start() {
            Ok((ticket, settings)) => {
                self.notice = None;
                Some(Command::Load(ticket, settings))
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                None
            }
        }
    }

    pub fn finish_loading(&mut self, ticket: LoadTicket, result: Result<Vec<Question>, SourceError>) {
        match self.game.complete_load(ticket, result) {
            LoadOutcome::Playing(_) => {
                self.cursor = 0;
                self.notice = None;
            }
            LoadOutcome::Unavailable(reason) => self.notice = Some(reason),
            LoadOutcome::Stale => {}
        }
    }

    /// Move the highlight down. The first move picks the highlighted option.
    pub fn select_next_option(&mut self) {
        let option = match self.game.session().turn() {
            Some(Turn::Pending { selected: None }) => self.cursor,
            _ => (self.cursor + 1) % NUM_OPTIONS,
        };
        self.move_cursor(option);
    }

    pub fn select_previous_option(&mut self) {
        let option = match self.game.session().turn() {
            Some(Turn::Pending { selected: None }) => self.cursor,
            _ => (self.cursor + NUM_OPTIONS - 1) % NUM_OPTIONS,
        };
        self.move_cursor(option);
    }

    /// Choose an option directly by its position.
    pub fn select_option(&mut self, option: usize) {
        if option < NUM_OPTIONS {
            self.move_cursor(option);
        }
    }

    /// Reveal the answer, or move past it once revealed.
    pub fn submit(&mut self) {
        let result = match self.game.session().turn() {
            Some(Turn::Pending { .. }) => self.game.check(),
            Some(Turn::Revealed { .. }) => {
                let result = self.game.advance();
                if result.is_ok() {
                    self.cursor = 0;
                }
                result
            }
            None => return,
        };
        self.report(result);
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.game.session().answers().len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Play again from a clean setup screen.
    pub fn restart(&mut self) {
        self.game.reset();
        self.cursor = 0;
        self.result_scroll = 0;
        self.notice = None;
    }

    fn move_cursor(&mut self, option: usize) {
        if matches!(self.game.session().turn(), Some(Turn::Revealed { .. })) {
            return;
        }
        self.cursor = option;
        let result = self.game.select(option);
        self.report(result);
    }

    fn report(&mut self, result: Result<(), GameError>) {
        self.notice = result.err().map(|err| err.to_string());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
