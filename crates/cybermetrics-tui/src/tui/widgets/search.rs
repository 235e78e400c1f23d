// Search box and result list, shared by the dashboard and the team builder.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::protocol::{SearchRow, SearchView};
use crate::tui::{Focus, ViewState};

use super::focus_border;

/// Render the one-line search input with its status on the title.
pub fn render_box(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Search;
    let mut spans = vec![Span::raw(" ")];
    if state.search_input.is_empty() && !focused {
        spans.push(Span::styled(
            "Search players... (press /)",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.search_input.clone()));
    }
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let title = match state.snapshot.search.as_ref().and_then(status_text) {
        Some(status) => format!(" Search ({}) ", status),
        None => " Search ".to_string(),
    };

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(focused))
            .title(title),
    );
    frame.render_widget(paragraph, area);
}

/// Render the result list. Only the dashboard focuses it; the team builder
/// shows its results through the candidate list instead.
pub fn render_results(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(" Results ");

    let Some(search) = state.snapshot.search.as_ref() else {
        frame.render_widget(block, area);
        return;
    };

    if let Some(error) = &search.error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if search.rows.is_empty() {
        let paragraph = Paragraph::new(format!(" {}", empty_text(search)))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = search.rows.iter().map(result_item).collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.results_idx));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn result_item(row: &SearchRow) -> ListItem<'static> {
    let style = if row.saved {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    ListItem::new(Line::from(Span::styled(result_text(row), style)))
}

/// "Mike Trout (2011-2024)  98.0" plus a saved marker.
pub fn result_text(row: &SearchRow) -> String {
    let r = &row.result;
    let mut text = format!(" {}", r.name);
    if !r.years_active.is_empty() {
        text.push_str(&format!(" ({})", r.years_active));
    }
    text.push_str(&format!("  {:.1}", r.score));
    if row.saved {
        text.push_str("  [saved]");
    }
    text
}

/// Short status for the search title while a lookup is queued or running.
pub fn status_text(search: &SearchView) -> Option<&'static str> {
    if search.searching {
        Some("searching...")
    } else if search.pending {
        Some("waiting...")
    } else {
        None
    }
}

pub fn empty_text(search: &SearchView) -> &'static str {
    if search.query.trim().is_empty() {
        "Type a player name to search"
    } else if search.searching || search.pending {
        "Searching..."
    } else {
        "No players found"
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
    fn result_text_formats_fields() {
        let row = SearchRow {
            result: hit(1, "Mike Trout"),
            saved: false,
        };
        assert_eq!(result_text(&row), " Mike Trout (2011-2024)  90.0");
        let saved = SearchRow { saved: true, ..row };
        assert!(result_text(&saved).ends_with("[saved]"));
    }

    #[test]
    fn empty_text_depends_on_query_and_status() {
        let mut search = SearchView::default();
        assert_eq!(empty_text(&search), "Type a player name to search");
        search.query = "zzz".into();
        search.pending = true;
        assert_eq!(empty_text(&search), "Searching...");
        assert_eq!(status_text(&search), Some("waiting..."));
        search.pending = false;
        assert_eq!(empty_text(&search), "No players found");
        assert_eq!(status_text(&search), None);
    }

    #[test]
    fn render_results_shows_error() {
        let mut snap = snapshot(Route::Dashboard, 1);
        if let Some(search) = snap.search.as_mut() {
            search.query = "x".into();
            search.error = Some("Search failed".into());
        }
        let state = view(snap);
        let backend = ratatui::backend::TestBackend::new(40, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_results(frame, frame.area(), &state))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("Search failed"));
    }

    #[test]
    fn render_box_and_results_do_not_panic() {
        let snap = with_results(
            snapshot(Route::Dashboard, 1),
            vec![hit(1, "Mike Trout"), hit(2, "Shohei Ohtani")],
        );
        let mut state = view(snap);
        state.search_input = "t".into();
        state.focus = Focus::Results;
        state.results_idx = 1;
        let backend = ratatui::backend::TestBackend::new(50, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_box(frame, Rect::new(0, 0, 50, 3), &state);
                render_results(frame, Rect::new(0, 3, 50, 7), &state);
            })
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Shohei Ohtani"));
    }
}
