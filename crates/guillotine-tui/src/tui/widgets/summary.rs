// Summary panel: weekly stat rows aligned under the standings week columns,
// followed by aggregates over the managers still alive.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use guillotine_core::color::contrast_text_color;
use guillotine_core::standings::{StandingsTable, SummaryCell, SurvivorSummary};
use guillotine_core::stats::SummaryStats;

use super::{cell_style, format_score};
use crate::tui::ViewState;

/// Width of the label column: the standings' fixed columns plus their gaps,
/// so week cells line up with the table above.
const LABEL_WIDTH: u16 = 51;
const WEEK_WIDTH: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Weekly Summary");
    let Some(table) = &state.table else {
        frame.render_widget(block, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    frame.render_widget(weekly_table(table), parts[0]);
    frame.render_widget(Paragraph::new(survivor_lines(&table.survivor_summary)), parts[1]);
}

fn weekly_table(table: &StandingsTable) -> Table<'static> {
    let rows: Vec<Row> = table
        .weekly_summary
        .iter()
        .map(|summary| {
            let mut cells = vec![Cell::from(summary.metric.label())];
            cells.extend(summary.cells.iter().map(summary_cell));
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain((0..table.visible_weeks).map(|_| Constraint::Length(WEEK_WIDTH)))
        .collect();

    Table::new(rows, widths).column_spacing(1)
}

fn summary_cell(cell: &SummaryCell) -> Cell<'static> {
    let text = format_score(cell.value);
    match &cell.background {
        Some(bg) => Cell::from(text).style(cell_style(bg, contrast_text_color(bg))),
        None => Cell::from(text),
    }
}

/// `avg 725.0  med 725.0  min 650.0  max 800.0`, dashes when empty.
pub fn format_stats(stats: &SummaryStats, decimals: usize) -> String {
    let f = |v: Option<f64>| {
        v.map(|v| format!("{v:.decimals$}"))
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "avg {}  med {}  min {}  max {}",
        f(stats.avg),
        f(stats.med),
        f(stats.min),
        f(stats.max)
    )
}

fn survivor_lines(summary: &SurvivorSummary) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    vec![
        Line::from(vec![
            Span::styled("Remaining FAAB      ", label),
            Span::raw(format_stats(&summary.faab_remaining, 1)),
        ]),
        Line::from(vec![
            Span::styled("Remaining avg pos   ", label),
            Span::raw(format_stats(&summary.avg_pos_above_chop, 2)),
        ]),
    ]
}
