// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// | Tab Bar (1 row)                                   |
// +--------------------------------------------------+
// | Standings (fill)                                  |
// +--------------------------------------------------+
// | Weekly Summary (11 rows)                          |
// +--------------------------------------------------+
//
// Tabs other than standings draw over the standings and summary zones
// together (`main`).
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the summary panel: six metric rows, two survivor rows, borders
/// and header.
pub const SUMMARY_HEIGHT: u16 = 11;

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// League, season, week, survivors, champions.
    pub status_bar: Rect,
    pub tab_bar: Rect,
    /// Manager rows with colored weekly cells.
    pub standings: Rect,
    /// Weekly stat rows and survivor aggregates.
    pub summary: Rect,
    /// Standings and summary combined.
    pub main: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(SUMMARY_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        tab_bar: vertical[1],
        standings: vertical[2],
        summary: vertical[3],
        main: vertical[2].union(vertical[3]),
        help_bar: vertical[4],
    }
}
