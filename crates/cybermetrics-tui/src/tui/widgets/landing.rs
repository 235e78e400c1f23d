// Landing page: title, welcome line, and the actions the session allows.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Cybermetrics",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Welcome to the Cybermetrics platform"),
        Line::from(""),
    ];
    lines.push(actions_line(state.snapshot.landing_auth));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Buttons under the welcome text. While the session check is outstanding
/// no buttons are offered.
pub fn actions_line(landing_auth: Option<bool>) -> Line<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    match landing_auth {
        None => Line::from(Span::styled(
            "Checking session...",
            Style::default().fg(Color::DarkGray),
        )),
        Some(true) => Line::from(vec![Span::styled("[d]", key), Span::raw(" Dashboard")]),
        Some(false) => Line::from(vec![
            Span::styled("[l]", key),
            Span::raw(" Login    "),
            Span::styled("[s]", key),
            Span::raw(" Sign Up"),
        ]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures::*;
    use cybermetrics_core::gate::Route;

    fn text(line: Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn actions_follow_session_check() {
        assert_eq!(text(actions_line(None)), "Checking session...");
        assert_eq!(text(actions_line(Some(true))), "[d] Dashboard");
        assert_eq!(text(actions_line(Some(false))), "[l] Login    [s] Sign Up");
    }

    #[test]
    fn render_shows_welcome() {
        let mut snap = snapshot(Route::Landing, 1);
        snap.landing_auth = Some(false);
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = view(snap);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Welcome to the Cybermetrics platform"));
        assert!(text.contains("Sign Up"));
    }
}
