use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.session().score();
    let total = app.total_questions();
    let percentage = calculate_percentage(score, total);
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], score, total, percentage, grade_color);
    render_question_breakdown(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    score: usize,
    total: usize,
    percentage: f64,
    grade_color: Color,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GAME OVER!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Your score: {} / {}  ({:.0}%)", score, total, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let questions = app.session().questions();
    let lines: Vec<Line> = app
        .session()
        .answers()
        .iter()
        .filter_map(|record| {
            let question = questions.get(record.question_index)?;
            let (symbol, color) = if record.was_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", record.question_index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(&question.text), Style::default().fg(Color::Gray)),
            ];
            if !record.was_correct {
                spans.push(Span::styled(
                    format!("  ({})", question.correct_text()),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Some(Line::from(spans))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r play again  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(calculate_percentage(0, 0), 0.0);
        assert_eq!(get_grade_color(calculate_percentage(5, 5)), Color::Green);
        assert_eq!(get_grade_color(calculate_percentage(3, 5)), Color::Yellow);
        assert_eq!(get_grade_color(calculate_percentage(1, 5)), Color::Red);
    }

    #[test]
    fn test_long_questions_are_truncated() {
        let long = "x".repeat(80);
        assert_eq!(truncate_question(&long).chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }
}
