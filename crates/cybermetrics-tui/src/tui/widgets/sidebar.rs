// Sidebar widget: brand and the numbered navigation items.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use cybermetrics_core::gate::Route;

use crate::tui::ViewState;

/// Render the sidebar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let current = state.snapshot.route;

    let mut items = vec![
        ListItem::new(Line::from(Span::styled(
            " Cybermetrics",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        ListItem::new(""),
    ];
    items.extend(Route::NAV.iter().enumerate().map(|(i, route)| {
        let style = if *route == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        ListItem::new(Line::from(Span::styled(nav_label(i, *route), style)))
    }));

    let list = List::new(items).block(Block::default().borders(Borders::RIGHT));
    frame.render_widget(list, area);
}

/// " 1 Dashboard" style label; `index` is zero-based.
pub fn nav_label(index: usize, route: Route) -> String {
    format!(" {} {}", index + 1, route.label())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
