// TUI widget modules, one per screen region.

pub mod auth_form;
pub mod dashboard;
pub mod detail;
pub mod gate;
pub mod header;
pub mod help_bar;
pub mod info_page;
pub mod landing;
pub mod search;
pub mod sidebar;
pub mod status_bar;
pub mod team_builder;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use cybermetrics_core::roster::{Banner, BannerKind};

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

/// One-line alert for a success or error banner.
pub fn banner_line(banner: &Banner) -> Line<'static> {
    let (icon, color) = match banner.kind {
        BannerKind::Success => ("✓", Color::Green),
        BannerKind::Error => ("✗", Color::Red),
    };
    Line::from(Span::styled(
        format!(" {} {}", icon, banner.message),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// Border style for a panel, highlighted when it has keyboard focus.
pub fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
        assert!(rect.x >= 19 && rect.x <= 21);
        assert!(rect.y >= 6 && rect.y <= 8);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let rect = centered_rect(40, 10, Rect::new(0, 0, 20, 5));
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
    }

    #[test]
    fn banner_line_shows_icon_and_message() {
        let line = banner_line(&Banner::error("Player not found"));
        assert_eq!(line.spans[0].content, " ✗ Player not found");
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
    }
}
