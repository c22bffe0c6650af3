mod quiz;
mod result;
mod setup;

use ratatui::{prelude::*, widgets::{Block, Paragraph}};

use crate::app::App;
use crate::game::GameState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let [body, notice] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    match app.state() {
        GameState::Setup => setup::render(frame, body, app),
        GameState::Loading => render_loading(frame, body),
        GameState::Playing(_) => quiz::render(frame, body, app),
        GameState::Finished => result::render(frame, body, app),
    }

    if let Some(message) = app.notice() {
        let widget = Paragraph::new(message)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, notice);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let widget = Paragraph::new("Loading questions...")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, middle);
}
