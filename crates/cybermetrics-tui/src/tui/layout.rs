// Screen layout: panel arrangement and sizing.
//
// Every route shares the same frame:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------+-----------------------------------+
// | Sidebar      | Header / user badge (3 rows)      |
// | (24 cols)    +-----------------------------------+
// |              | Main Panel                         |
// |              |                                    |
// +--------------+-----------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the navigation sidebar in columns.
pub const SIDEBAR_WIDTH: u16 = 24;

/// Height of the header holding the user badge.
pub const HEADER_HEIGHT: u16 = 3;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: brand, current route, API endpoint.
    pub status_bar: Rect,
    /// Left column: brand and navigation items.
    pub sidebar: Rect,
    /// Above the main panel: page title and user badge.
    pub header: Rect,
    /// Route content.
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | body(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(6),    // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: sidebar | content
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(body);

    let sidebar = horizontal[0];
    let content = horizontal[1];

    // Content: header | main panel
    let content_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(3)])
        .split(content);

    AppLayout {
        status_bar,
        sidebar,
        header: content_sections[0],
        main_panel: content_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
