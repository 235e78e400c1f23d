// Static informational pages: Team Analysis, Recommendations, MLB Teams.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use cybermetrics_core::gate::Route;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let route = state.snapshot.route;
    let lines = vec![
        Line::from(Span::styled(
            route.label(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(page_text(route)),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Body copy for each informational route.
pub fn page_text(route: Route) -> &'static str {
    match route {
        Route::TeamAnalysis => {
            "Deep dives into lineup strengths, weaknesses, and matchup readiness will live here. \
             Expect radar charts, trend indicators, and scouting notes tailored to your roster."
        }
        Route::Recommendations => {
            "Personalized acquisition targets, lineup tweaks, and player development plans will \
             surface here based on your saved roster and scouting filters."
        }
        Route::MlbTeams => {
            "League-wide scouting reports, organizational depth charts, and opponent scouting \
             packs will be available here to help you prep for every series."
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures::*;

    #[test]
    fn every_info_route_has_copy() {
        for route in [Route::TeamAnalysis, Route::Recommendations, Route::MlbTeams] {
            assert!(!page_text(route).is_empty());
        }
        assert!(page_text(Route::Dashboard).is_empty());
    }

    #[test]
    fn render_wraps_copy() {
        let state = view(snapshot(Route::MlbTeams, 1));
        let backend = ratatui::backend::TestBackend::new(50, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("League-wide scouting"));
    }
}
