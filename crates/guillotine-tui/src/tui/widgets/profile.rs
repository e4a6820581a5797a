// Profile tab: manager picker on the left, the selected manager's career on
// the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use guillotine_core::profile::{CareerStats, ManagerProfile, WeekScore, FAAB_TRACKED_FROM};

use super::format_score;
use crate::tui::ViewState;

const PICKER_WIDTH: u16 = 22;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PICKER_WIDTH), Constraint::Min(20)])
        .split(area);

    render_picker(frame, columns[0], state);

    let Some(profile) = &state.profile else {
        let block = Block::default().borders(Borders::ALL).title("Profile");
        frame.render_widget(
            Paragraph::new("Select a manager and press Enter.").block(block),
            columns[1],
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(columns[1]);
    let career = Block::default()
        .borders(Borders::ALL)
        .title(format!("Career: {}", profile.user_name));
    frame.render_widget(
        Paragraph::new(career_lines(&profile.career)).block(career),
        rows[0],
    );
    frame.render_widget(season_table(profile, state.scroll_offset), rows[1]);
}

fn render_picker(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines: Vec<Line> = state
        .profile_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if i == state.profile_cursor {
                Line::from(Span::styled(
                    format!("> {name}"),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {name}"))
            }
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Managers");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn week_moment(week: Option<WeekScore>) -> String {
    match week {
        Some(w) => format!("{:.2} ({} wk {})", w.score, w.season, w.week),
        None => "-".to_string(),
    }
}

fn career_lines(career: &CareerStats) -> Vec<Line<'static>> {
    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    };
    vec![
        Line::from(vec![
            label("Seasons "),
            Span::raw(career.seasons_played.to_string()),
            label("   Titles "),
            Span::styled(career.championships.to_string(), Style::default().fg(Color::Yellow)),
            label("   Top 3 "),
            Span::raw(career.top_3_finishes.to_string()),
            label("   Avg finish "),
            Span::raw(format_score(career.average_finish)),
        ]),
        Line::from(vec![
            label("Weeks "),
            Span::raw(career.total_weeks_played.to_string()),
            label("   Points "),
            Span::raw(format!("{:.2}", career.total_points)),
            label("   Avg score "),
            Span::raw(format_score(career.career_avg_score)),
        ]),
        Line::from(vec![label("Best week  "), Span::raw(week_moment(career.best_week))]),
        Line::from(vec![label("Worst week "), Span::raw(week_moment(career.worst_week))]),
        Line::from(vec![
            label("Close calls "),
            Span::raw(career.close_calls.to_string()),
            label("   FAAB spent "),
            Span::raw(career.total_faab_spent.to_string()),
            label("   wasted "),
            Span::raw(career.total_faab_wasted.to_string()),
            Span::styled(
                format!(" (since {FAAB_TRACKED_FROM})"),
                Style::default().fg(Color::Gray),
            ),
        ]),
    ]
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn season_table(profile: &ManagerProfile, scroll_offset: usize) -> Table<'static> {
    let rows: Vec<Row> = profile
        .seasons
        .iter()
        .skip(scroll_offset)
        .map(|s| {
            let finish = Cell::from(opt(s.finish_position));
            let finish = if s.finish_position == Some(1) {
                finish.style(Style::default().fg(Color::Yellow))
            } else {
                finish
            };
            Row::new(vec![
                Cell::from(s.season.to_string()),
                finish,
                Cell::from(opt(s.chop_week)),
                Cell::from(opt(s.draft_position)),
                Cell::from(s.weeks_played.to_string()),
                Cell::from(format!("{:.2}", s.season_total)),
                Cell::from(format_score(s.avg_score)),
                Cell::from(s.close_calls.to_string()),
                Cell::from(s.faab_spent.to_string()),
                Cell::from(s.faab_wasted.to_string()),
                Cell::from(s.avg_pos_above_chop.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
    ];
    let header = Row::new(
        ["Season", "Fin", "Chop", "Draft", "Weeks", "Points", "Avg", "CC", "Spent", "Waste", "AvgPos"]
            .map(Cell::from),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("Seasons"))
}
