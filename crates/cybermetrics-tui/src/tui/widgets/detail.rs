// Player detail overlay: a centered card drawn above the current screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use cybermetrics_core::models::PlayerDetail;

use super::centered_rect;
use crate::protocol::DetailView;
use crate::tui::ViewState;

const CARD_WIDTH: u16 = 60;
const CARD_HEIGHT: u16 = 16;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(detail) = state.snapshot.detail.as_ref() else {
        return;
    };
    let card = centered_rect(CARD_WIDTH, CARD_HEIGHT, area);
    frame.render_widget(Clear, card);

    let (title, mut lines) = match detail {
        DetailView::Loading(_) => (
            "Player".to_string(),
            vec![Line::from(Span::styled(
                " Loading player details...",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        DetailView::Loaded(player) => (player.name.clone(), detail_lines(player)),
        DetailView::Failed { message, .. } => (
            "Player".to_string(),
            vec![
                Line::from(Span::styled(
                    " Error loading player details",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(" {}", message)),
            ],
        ),
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " [Esc] Close",
        Style::default().fg(Color::Yellow),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
        );
    frame.render_widget(paragraph, card);
}

/// Years active, then one "Label: value" line per known field.
pub fn detail_lines(player: &PlayerDetail) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(years) = player.years_active.as_deref().filter(|y| !y.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!(" Years active: {}", years),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(""));
    }
    for (label, value) in player.rows() {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<22}", format!("{}:", label)),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(value),
        ]));
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
