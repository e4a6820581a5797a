// Recap tab: champion, elimination order, superlatives, the closest and
// widest chops, and one highlight row per week.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use guillotine_core::model::MAX_WEEK;
use guillotine_core::recap::{ScoreMoment, SeasonRecap};

use super::format_score;
use crate::tui::ViewState;

/// Header plus up to five rows, inside borders.
const RECAP_TABLE_HEIGHT: u16 = 8;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(recap) = &state.recap else {
        let text = if state.loading.is_some() {
            "Loading recap..."
        } else {
            "No season loaded."
        };
        let block = Block::default().borders(Borders::ALL).title("Recap");
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(RECAP_TABLE_HEIGHT),
            Constraint::Min(3),
        ])
        .split(area);
    let margins = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let overview = Block::default()
        .borders(Borders::ALL)
        .title(title(recap));
    frame.render_widget(Paragraph::new(overview_lines(recap)).block(overview), rows[0]);
    frame.render_widget(close_call_table(recap), margins[0]);
    frame.render_widget(blowout_table(recap), margins[1]);
    frame.render_widget(highlight_table(recap, state.scroll_offset), rows[2]);
}

fn title(recap: &SeasonRecap) -> String {
    if recap.is_complete {
        format!("Recap {} (final)", recap.season)
    } else {
        format!("Recap {} (week {}/{MAX_WEEK})", recap.season, recap.current_week)
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

fn overview_lines(recap: &SeasonRecap) -> Vec<Line<'static>> {
    let sup = &recap.superlatives;
    let champion = recap.champion.clone().unwrap_or_else(|| "-".to_string());
    let order = if recap.elimination_order.is_empty() {
        "-".to_string()
    } else {
        recap
            .elimination_order
            .iter()
            .map(|e| format!("W{} {}", e.week, e.manager))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let moment = |m: &Option<ScoreMoment>| match m {
        Some(m) => format!("{} {:.2} (week {})", m.manager, m.score, m.week),
        None => "-".to_string(),
    };

    vec![
        Line::from(vec![
            label("Champion            "),
            Span::styled(champion, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![label("Chopped             "), Span::raw(order)]),
        Line::from(vec![label("Highest score       "), Span::raw(moment(&sup.highest_score))]),
        Line::from(vec![
            label("Lowest survivor     "),
            Span::raw(moment(&sup.lowest_survivor_score)),
        ]),
        Line::from(vec![
            label("Most close calls    "),
            Span::raw(match &sup.most_close_calls {
                Some((name, n)) => format!("{name} ({n})"),
                None => "-".to_string(),
            }),
        ]),
        Line::from(vec![
            label("Best avg position   "),
            Span::raw(match &sup.best_avg_position {
                Some((name, pos)) => format!("{name} ({pos:.1})"),
                None => "-".to_string(),
            }),
        ]),
    ]
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

fn close_call_table(recap: &SeasonRecap) -> Table<'static> {
    let rows: Vec<Row> = recap
        .close_calls
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.week.to_string()),
                Cell::from(c.survivor.clone()),
                Cell::from(c.chopped.clone()),
                Cell::from(format!("{:.2}", c.margin)),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Min(10),
            Constraint::Length(7),
        ],
    )
    .header(header(&["Wk", "Survived", "Chopped", "Margin"]))
    .column_spacing(1)
    .block(Block::default().borders(Borders::ALL).title("Close Calls"))
}

fn blowout_table(recap: &SeasonRecap) -> Table<'static> {
    let rows: Vec<Row> = recap
        .biggest_blowouts
        .iter()
        .map(|b| {
            Row::new(vec![
                Cell::from(b.week.to_string()),
                Cell::from(b.chopped.clone()),
                Cell::from(format!("{:.2}", b.score)),
                Cell::from(format!("{:.2}", b.margin_to_safety)),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header(&["Wk", "Chopped", "Score", "Short"]))
    .column_spacing(1)
    .block(Block::default().borders(Borders::ALL).title("Blowouts"))
}

fn highlight_table(recap: &SeasonRecap, scroll_offset: usize) -> Table<'static> {
    let rows: Vec<Row> = recap
        .weekly_highlights
        .iter()
        .skip(scroll_offset)
        .map(|h| {
            Row::new(vec![
                Cell::from(h.week.to_string()),
                Cell::from(h.high_scorer.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_score(h.high_score)),
                Cell::from(format_score(h.median)),
                Cell::from(h.eliminated.clone().unwrap_or_else(|| "-".to_string()))
                    .style(Style::default().fg(Color::Red)),
                Cell::from(format_score(h.chop_score)),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(18),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(18),
            Constraint::Length(7),
        ],
    )
    .header(header(&["Wk", "High Scorer", "High", "Median", "Chopped", "Chop"]))
    .column_spacing(1)
    .block(Block::default().borders(Borders::ALL).title("Weekly Highlights"))
}
