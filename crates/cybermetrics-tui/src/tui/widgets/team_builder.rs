// Team builder: search box, the lineup diamond, and the candidate list.
//
// +---------------------------------------------------+
// | Search box (3 rows)                                 |
// +-------------------------------+-------------------+
// | Diamond (60%)                  | Candidates (40%)   |
// +-------------------------------+-------------------+
// | Lineup message (1 row)                              |
// +---------------------------------------------------+

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use cybermetrics_core::lineup::Slot;
use cybermetrics_core::models::PlayerSummary;

use super::{focus_border, search};
use crate::protocol::{Candidate, LineupView};
use crate::tui::{Focus, ViewState};

/// Diamond rows from deep outfield to the batter's box, DH set apart.
pub const DIAMOND_ROWS: [&[Slot]; 7] = [
    &[Slot::CenterField],
    &[Slot::LeftField, Slot::RightField],
    &[Slot::Shortstop, Slot::SecondBase],
    &[Slot::ThirdBase, Slot::FirstBase],
    &[Slot::Pitcher],
    &[Slot::Catcher],
    &[Slot::DesignatedHitter],
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [box_area, body, message_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(area);
    let [diamond_area, candidates_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);

    search::render_box(frame, box_area, state);

    let Some(lineup) = state.snapshot.lineup.as_ref() else {
        return;
    };
    render_diamond(frame, diamond_area, state, lineup);
    render_candidates(frame, candidates_area, state, lineup);
    render_message(frame, message_area, lineup);
}

fn render_diamond(frame: &mut Frame, area: Rect, state: &ViewState, lineup: &LineupView) {
    let focused = state.focus == Focus::Slots;
    let cursor = focused.then_some(state.slot_cursor);

    let mut lines = Vec::new();
    for (i, row) in DIAMOND_ROWS.iter().enumerate() {
        // Blank spacer before the DH, which sits off the field
        if i == DIAMOND_ROWS.len() - 1 {
            lines.push(Line::from(""));
        }
        let mut spans = Vec::new();
        for (j, slot) in row.iter().enumerate() {
            if j > 0 {
                spans.push(Span::raw("      "));
            }
            let player = lineup
                .slots
                .iter()
                .find(|(s, _)| s == slot)
                .and_then(|(_, p)| p.as_ref());
            spans.push(Span::styled(
                slot_text(*slot, player),
                slot_style(*slot, player.is_some(), lineup.active, cursor),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(focused))
            .title(format!(" Lineup ({}/{}) ", lineup.filled, Slot::ALL.len())),
    );
    frame.render_widget(paragraph, area);
}

/// "[CF] Mike Trout" or "[CF] ---".
pub fn slot_text(slot: Slot, player: Option<&PlayerSummary>) -> String {
    match player {
        Some(p) => format!("[{}] {}", slot.label(), p.name),
        None => format!("[{}] ---", slot.label()),
    }
}

fn slot_style(slot: Slot, filled: bool, active: Option<Slot>, cursor: Option<Slot>) -> Style {
    let mut style = if active == Some(slot) {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if filled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if cursor == Some(slot) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn render_candidates(frame: &mut Frame, area: Rect, state: &ViewState, lineup: &LineupView) {
    let focused = state.focus == Focus::Candidates;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(" Candidates ");

    if lineup.candidates.is_empty() {
        let paragraph = Paragraph::new(" Search or save players to fill the lineup")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = lineup
        .candidates
        .iter()
        .map(|c| {
            let style = if c.assignable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(candidate_text(c), style)))
        })
        .collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.candidate_idx));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn candidate_text(candidate: &Candidate) -> String {
    let mut text = format!(" {}", candidate.player.name);
    if let Some(years) = candidate.player.years_active.as_deref() {
        text.push_str(&format!(" ({})", years));
    }
    if !candidate.assignable {
        text.push_str("  [in lineup]");
    }
    text
}

fn render_message(frame: &mut Frame, area: Rect, lineup: &LineupView) {
    let line = match (&lineup.message, lineup.active) {
        (Some(message), _) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red),
        )),
        (None, Some(slot)) => Line::from(Span::styled(
            format!(" Assigning to {}: pick a candidate", slot.label()),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::from(Span::styled(
            " Select a position on the diamond, then pick a candidate",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures::*;
    use cybermetrics_core::gate::Route;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(110, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn diamond_rows_cover_every_slot_once() {
        let mut all: Vec<Slot> = DIAMOND_ROWS.iter().flat_map(|r| r.iter().copied()).collect();
        all.sort();
        assert_eq!(all, Slot::ALL.to_vec());
    }

    #[test]
    fn slot_text_filled_and_empty() {
        assert_eq!(slot_text(Slot::Catcher, None), "[C] ---");
        let p = summary(9, "Yadier Molina");
        assert_eq!(slot_text(Slot::Catcher, Some(&p)), "[C] Yadier Molina");
    }

    #[test]
    fn candidate_text_marks_assigned() {
        let c = Candidate {
            player: summary(1, "Mike Trout"),
            assignable: false,
        };
        assert_eq!(candidate_text(&c), " Mike Trout  [in lineup]");
    }

    #[test]
    fn cursor_slot_is_reversed_and_active_is_bold() {
        let style = slot_style(Slot::Pitcher, false, Some(Slot::Pitcher), Some(Slot::Pitcher));
        assert!(style.add_modifier.contains(Modifier::REVERSED));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        let plain = slot_style(Slot::Pitcher, true, None, None);
        assert_eq!(plain.fg, Some(Color::White));
    }

    #[test]
    fn render_shows_assigned_player_and_message() {
        let mut snap = with_candidates(
            snapshot(Route::TeamBuilder, 1),
            vec![(summary(1, "Mike Trout"), false)],
        );
        if let Some(lineup) = snap.lineup.as_mut() {
            lineup.slots[1].1 = Some(summary(1, "Mike Trout"));
            lineup.filled = 1;
            lineup.message = Some("Mike Trout is already playing CF".into());
        }
        let text = draw(&view(snap));
        assert!(text.contains("[CF] Mike Trout"));
        assert!(text.contains("Lineup (1/10)"));
        assert!(text.contains("already playing CF"));
    }

    #[test]
    fn render_prompts_for_position() {
        let text = draw(&view(snapshot(Route::TeamBuilder, 1)));
        assert!(text.contains("Select a position on the diamond"));
        assert!(text.contains("Search or save players"));
    }
}
