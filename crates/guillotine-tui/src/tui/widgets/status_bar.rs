// Status bar widget: league, season, week, survivors, champions.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use guillotine_core::model::MAX_WEEK;

use crate::protocol::{SeasonsInfo, TabId};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let league = state
        .seasons
        .as_ref()
        .map(|s| s.league_name.as_str())
        .unwrap_or("Guillotine");
    spans.push(Span::styled(
        format!(" {league} "),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    spans.push(separator());

    if let Some(info) = &state.seasons {
        spans.extend(season_spans(info));
        spans.push(separator());
    }

    if let Some(loading) = state.loading {
        spans.push(Span::styled(
            format!("Loading {}...", loading.season),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(table) = &state.table {
        spans.push(Span::styled(
            week_label(table.visible_weeks, state.week_override, table.status.as_deref()),
            Style::default().fg(Color::White),
        ));
        spans.push(separator());
        spans.push(Span::styled(
            format!("{} remaining", table.remaining),
            Style::default().fg(Color::White),
        ));
        if let Some(champion) = &table.champion {
            spans.push(separator());
            spans.push(Span::styled(
                format!("Champion: {champion}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(reigning) = &table.reigning_champion {
            spans.push(separator());
            spans.push(Span::styled(
                format!("Reigning: {reigning}"),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn separator() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::Gray))
}

/// Season list with the selected season highlighted, e.g. `2023 [2024] 2025`.
pub fn season_spans(info: &SeasonsInfo) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, season) in info.seasons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        if *season == info.selected {
            spans.push(Span::styled(
                format!("[{season}]"),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(season.to_string(), Style::default().fg(Color::Gray)));
        }
    }
    spans
}

fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::Standings => "1:Standings",
        TabId::Recap => "2:Recap",
        TabId::Profile => "3:Profile",
        TabId::Activity => "4:Activity",
        TabId::League => "5:League",
    }
}

/// Tab selector, e.g. `[1:Standings] 2:Recap ...` with the active tab
/// highlighted.
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in TabId::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let label = tab_label(*tab);
        if *tab == active {
            spans.push(Span::styled(
                format!("[{label}]"),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::Gray)));
        }
    }
    spans
}

/// Week indicator for the status bar.
pub fn week_label(visible_weeks: u32, week_override: Option<u32>, status: Option<&str>) -> String {
    match status {
        Some("pre_draft") => return "Pre-draft".to_string(),
        Some("drafting") => return "Drafting".to_string(),
        _ => {}
    }
    match week_override {
        Some(week) => format!("Week {week}/{MAX_WEEK} (override)"),
        None => format!("Week {visible_weeks}/{MAX_WEEK}"),
    }
}
