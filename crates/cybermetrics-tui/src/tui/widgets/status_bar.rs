// Status bar widget: brand, session indicator, current route, API endpoint.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [session dot] Cybermetrics | <route path> | API <base url>
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let (dot, dot_color) = session_indicator(snapshot.authenticated);

    let spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(
            "Cybermetrics",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(snapshot.route.path(), Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("API {}", snapshot.api_url),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Dot character and color for the local session state.
pub fn session_indicator(authenticated: bool) -> (&'static str, Color) {
    if authenticated {
        ("●", Color::Green)
    } else {
        ("●", Color::Red)
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

    #[test]
    fn session_indicator_colors() {
        assert_eq!(session_indicator(true).1, Color::Green);
        assert_eq!(session_indicator(false).1, Color::Red);
    }

    #[test]
    fn render_shows_route_path_and_api() {
        let state = view(snapshot(Route::TeamBuilder, 1));
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("/teambuilder"));
        assert!(text.contains("API http://localhost:8000"));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(20, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
