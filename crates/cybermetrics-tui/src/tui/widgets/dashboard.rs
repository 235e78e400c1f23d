// Dashboard: account line with health check, player search, saved roster.
//
// +-----------------------------------------------+
// | Logged in as ... / health result (4 rows)      |
// +--------------------------+--------------------+
// | Search box (3 rows)       | Saved players       |
// | Results                   |                    |
// +--------------------------+--------------------+

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use cybermetrics_core::models::SavedPlayer;

use super::{banner_line, focus_border, search};
use crate::protocol::HealthView;
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [account_area, body] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(4)]).areas(area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
    let [box_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(2)]).areas(left);

    render_account(frame, account_area, state);
    search::render_box(frame, box_area, state);
    search::render_results(frame, results_area, state);
    render_saved(frame, right, state);
}

fn render_account(frame: &mut Frame, area: Rect, state: &ViewState) {
    let email = state.snapshot.user.email.as_deref().unwrap_or("");
    let lines = vec![
        Line::from(vec![
            Span::raw(" Logged in as: "),
            Span::styled(
                email.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        health_line(state.snapshot.health.as_ref()),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Account "),
    );
    frame.render_widget(paragraph, area);
}

/// The Check Health button, or the last check's outcome.
pub fn health_line(health: Option<&HealthView>) -> Line<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    match health {
        None => Line::from(vec![
            Span::raw(" "),
            Span::styled("[h]", key),
            Span::raw(" Check Health   "),
            Span::styled("[o]", key),
            Span::raw(" Logout"),
        ]),
        Some(HealthView::Checking) => Line::from(Span::styled(
            " Checking...",
            Style::default().fg(Color::DarkGray),
        )),
        Some(HealthView::Done { result, checked_at }) => {
            let (text, color) = match result {
                Ok(summary) => (format!(" ✓ {}", summary), Color::Green),
                Err(message) => (format!(" ✗ {}", message), Color::Red),
            };
            Line::from(vec![
                Span::styled(text, Style::default().fg(color)),
                Span::styled(
                    format!("  (checked {})", checked_at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
    }
}

fn render_saved(frame: &mut Frame, area: Rect, state: &ViewState) {
    let roster = &state.snapshot.roster;
    let focused = state.focus == Focus::Saved;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(format!(" Saved Players ({}) ", roster.players.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Banner takes the first row when present.
    let list_area = match &roster.banner {
        Some(banner) if inner.height > 1 => {
            let [banner_area, rest] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);
            frame.render_widget(Paragraph::new(banner_line(banner)), banner_area);
            rest
        }
        _ => inner,
    };

    if let Some(error) = &roster.error {
        frame.render_widget(
            Paragraph::new(format!(" {}", error)).style(Style::default().fg(Color::Red)),
            list_area,
        );
        return;
    }
    if roster.players.is_empty() {
        let text = if roster.loading {
            " Loading saved players..."
        } else {
            " No saved players yet"
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem> = roster
        .players
        .iter()
        .map(|p| ListItem::new(saved_text(p)))
        .collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.saved_idx));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

/// " Clayton Kershaw (2008-2024)"
pub fn saved_text(player: &SavedPlayer) -> String {
    match player.years_active.as_deref().filter(|y| !y.is_empty()) {
        Some(years) => format!(" {} ({})", player.name, years),
        None => format!(" {}", player.name),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures::*;
    use chrono::Local;
    use cybermetrics_core::gate::Route;
    use cybermetrics_core::roster::Banner;

    fn text(line: Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn health_line_states() {
        assert!(text(health_line(None)).contains("Check Health"));
        assert_eq!(text(health_line(Some(&HealthView::Checking))), " Checking...");

        let ok = HealthView::Done {
            result: Ok("Server is healthy, Firebase is connected".into()),
            checked_at: Local::now(),
        };
        assert!(text(health_line(Some(&ok))).starts_with(" ✓ Server is healthy"));

        let err = HealthView::Done {
            result: Err("No response from server".into()),
            checked_at: Local::now(),
        };
        assert!(text(health_line(Some(&err))).starts_with(" ✗ No response from server"));
    }

    #[test]
    fn saved_text_with_and_without_years() {
        assert_eq!(saved_text(&saved(1, "Mookie Betts")), " Mookie Betts (2009-2023)");
        let mut p = saved(2, "Rookie");
        p.years_active = None;
        assert_eq!(saved_text(&p), " Rookie");
    }

    #[test]
    fn render_shows_account_and_saved_list() {
        let mut snap = snapshot(Route::Dashboard, 1);
        snap.roster.players = vec![saved(10, "Clayton Kershaw")];
        snap.roster.banner = Some(Banner::success("Clayton Kershaw added to your roster"));
        let text = draw(&view(snap));
        assert!(text.contains("Logged in as: mike@angels.com"));
        assert!(text.contains("Saved Players (1)"));
        assert!(text.contains("added to your roster"));
    }

    #[test]
    fn render_empty_and_error_states() {
        let mut snap = snapshot(Route::Dashboard, 1);
        snap.roster.loading = true;
        assert!(draw(&view(snap.clone())).contains("Loading saved players"));

        snap.roster.loading = false;
        snap.roster.error = Some("Failed to fetch saved players".into());
        assert!(draw(&view(snap)).contains("Failed to fetch saved players"));
    }
}
