use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::game::Turn;
use crate::models::Question;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(question), Some(turn)) = (app.current_question(), app.session().turn()) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app, &question.category);
    render_question_text(frame, chunks[2], &question.text);
    render_options(frame, chunks[3], question, turn, app.cursor());
    render_controls(frame, chunks[4], turn);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App, category: &str) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let category = Paragraph::new(category.to_string()).fg(Color::DarkGray);
    frame.render_widget(category, left);

    let progress = format!(
        "Question {} of {}  ·  score {}",
        app.current_question_number(),
        app.total_questions(),
        app.session().score()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, right);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, turn: Turn, cursor: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let style = option_style(question, turn, index, cursor);
        let marker = if Some(index) == turn.selected() { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn option_style(question: &Question, turn: Turn, index: usize, cursor: usize) -> Style {
    match turn {
        Turn::Revealed { .. } if question.is_correct(index) => Style::default().fg(Color::Green).bold(),
        Turn::Revealed { selected } if selected == index => Style::default().fg(Color::Red).bold(),
        Turn::Revealed { .. } => Style::default().fg(Color::DarkGray),
        Turn::Pending { selected } if selected == Some(index) => Style::default().fg(Color::Cyan).bold(),
        Turn::Pending { .. } if cursor == index => Style::default().fg(Color::Cyan),
        Turn::Pending { .. } => Style::default().fg(Color::Gray),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, turn: Turn) {
    let text = match turn {
        Turn::Pending { .. } => "j/k or a-d choose  ·  enter check  ·  q quit",
        Turn::Revealed { .. } => "enter next  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
