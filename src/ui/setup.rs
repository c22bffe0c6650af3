use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::models::{Category, Difficulty};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let [_, panel, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let settings = app.session().settings();
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA GAME",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Select Categories:".fg(Color::DarkGray)),
    ];

    let categories: Vec<Span> = Category::SELECTABLE
        .iter()
        .enumerate()
        .flat_map(|(index, category)| {
            let style = if settings.has_category(*category) {
                Style::default().fg(Color::Blue).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!("{}:{}", index + 1, category.name()), style),
                Span::raw("  "),
            ]
        })
        .collect();
    content.push(Line::from(categories));
    content.push(Line::from(""));

    content.push(Line::from("Difficulty:".fg(Color::DarkGray)));
    let difficulties: Vec<Span> = Difficulty::ALL
        .iter()
        .flat_map(|difficulty| {
            let style = if *difficulty == settings.difficulty {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(difficulty.as_str(), style), Span::raw("  ")]
        })
        .collect();
    content.push(Line::from(difficulties));
    content.push(Line::from(""));

    content.push(Line::from("Number of Questions:".fg(Color::DarkGray)));
    content.push(Line::from(Span::styled(
        format!("< {} >", settings.question_count()),
        Style::default().fg(Color::White).bold(),
    )));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "ENTER",
        Style::default().fg(Color::Magenta).bold(),
    )));
    content.push(Line::from("to start".fg(Color::DarkGray)));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, panel);

    let controls = Paragraph::new("1-5 category  ·  d difficulty  ·  +/- questions  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    let [_, controls_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    frame.render_widget(controls, controls_area);
}
