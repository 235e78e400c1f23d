// Placeholder shown in the main panel while a screen's auth gate is settling.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use cybermetrics_core::gate::GateState;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(gate_text(state.snapshot.gate))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

pub fn gate_text(gate: Option<GateState>) -> String {
    match gate {
        Some(GateState::Redirecting(route)) => format!("Redirecting to {}...", route.label()),
        _ => "Checking authentication...".to_string(),
    }
}
