// Header widget: page title on the left, user badge on the right.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use cybermetrics_core::session::CurrentUser;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title_area, badge_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Min(10)]).areas(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", state.snapshot.route.label()),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, title_area);

    let badge = Paragraph::new(badge_line(&state.snapshot.user)).alignment(Alignment::Right);
    frame.render_widget(badge, badge_area);
}

/// "[M] mike  mike@angels.com", or "[G] Guest" when logged out.
pub fn badge_line(user: &CurrentUser) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("[{}]", user.initials()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(user.display_name(), Style::default().fg(Color::White)),
    ];
    if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
        spans.push(Span::styled(
            format!("  {}", email),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
