// Help bar widget: key hints for the mounted route and focus.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cybermetrics_core::gate::Route;

use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn help_text(state: &ViewState) -> &'static str {
    let snapshot = &state.snapshot;
    if snapshot.detail.is_some() {
        return " Esc/Enter:Close";
    }
    if !snapshot.content_visible() {
        return " q:Quit";
    }
    match (snapshot.route, state.focus) {
        (Route::Landing, _) => " l:Login | s:Sign Up | d:Dashboard | q:Quit",
        (Route::Login | Route::Signup, _) => " Tab:Next field | Enter:Submit | Esc:Back",
        (_, Focus::Search) => " Type to search | Tab/Enter:Leave search | Ctrl+C:Quit",
        (Route::Dashboard, Focus::Results) => {
            " j/k:Move | a:Add | i:Details | h:Health | /:Search | Tab:Focus | o:Logout | q:Quit"
        }
        (Route::Dashboard, _) => {
            " j/k:Move | d:Remove | i:Details | h:Health | /:Search | Tab:Focus | o:Logout | q:Quit"
        }
        (Route::TeamBuilder, Focus::Slots) => {
            " Arrows:Move | Enter:Select position | x:Clear | /:Search | Tab:Focus | q:Quit"
        }
        (Route::TeamBuilder, _) => {
            " j/k:Move | Enter:Assign | i:Details | /:Search | Tab:Focus | o:Logout | q:Quit"
        }
        _ => " 1-5:Navigate | o:Logout | q:Quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DetailView;
    use crate::tui::fixtures::*;

    #[test]
    fn help_text_follows_focus() {
        let mut state = view(snapshot(Route::Dashboard, 1));
        assert!(help_text(&state).contains("Type to search"));
        state.focus = Focus::Results;
        assert!(help_text(&state).contains("a:Add"));
        state.focus = Focus::Saved;
        assert!(help_text(&state).contains("d:Remove"));
    }

    #[test]
    fn help_text_for_overlay() {
        let mut snap = snapshot(Route::TeamBuilder, 1);
        snap.detail = Some(DetailView::Loading(1));
        assert_eq!(help_text(&view(snap)), " Esc/Enter:Close");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(20, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
