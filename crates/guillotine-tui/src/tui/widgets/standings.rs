// Standings widget: one row per manager with colored weekly score cells.
//
// Columns: Manager, Draft, FAAB, Wasted, Close calls, Avg pos above chop,
// Finish, then one cell per visible week painted with the week's gradient.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use guillotine_core::standings::{CellState, ManagerRow, ScoreCell, StandingsTable};

use super::{cell_style, format_score, hex_color};
use crate::tui::ViewState;

const FIXED_COLUMNS: [(&str, u16); 7] = [
    ("Manager", 18),
    ("Draft", 5),
    ("FAAB", 5),
    ("Waste", 5),
    ("CC", 3),
    ("AvgPos", 6),
    ("Fin", 3),
];

const WEEK_WIDTH: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title(title(state));

    let Some(table) = &state.table else {
        let text = if state.loading.is_some() {
            "Loading season..."
        } else {
            "No season loaded."
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let mut header_cells: Vec<Cell> = FIXED_COLUMNS.iter().map(|(name, _)| Cell::from(*name)).collect();
    header_cells.extend((1..=table.visible_weeks).map(|w| Cell::from(format!("Wk{w}"))));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = table
        .rows
        .iter()
        .skip(state.scroll_offset)
        .map(manager_row)
        .collect();

    let widget = Table::new(rows, column_widths(table))
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(widget, area);
}

fn title(state: &ViewState) -> String {
    match &state.table {
        Some(table) => format!("Standings {}", table.season),
        None => "Standings".to_string(),
    }
}

pub fn column_widths(table: &StandingsTable) -> Vec<Constraint> {
    FIXED_COLUMNS
        .iter()
        .map(|(_, w)| Constraint::Length(*w))
        .chain((0..table.visible_weeks).map(|_| Constraint::Length(WEEK_WIDTH)))
        .collect()
}

/// Name with a marker for this season's champion (★) or last season's (♛).
pub fn display_name(row: &ManagerRow) -> String {
    let mut name = row.user_name.clone();
    if row.is_champion {
        name.push_str(" ★");
    }
    if row.is_reigning_champion {
        name.push_str(" ♛");
    }
    name
}

fn manager_row(row: &ManagerRow) -> Row<'static> {
    let name_style = if row.remaining {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut cells = vec![
        Cell::from(display_name(row)).style(name_style),
        Cell::from(opt(row.draft_position)),
        Cell::from(row.faab_remaining.to_string()),
        Cell::from(opt(row.faab_wasted)),
        Cell::from(opt(row.close_calls)),
        Cell::from(row.avg_pos_above_chop.map(|a| format!("{a:.1}")).unwrap_or_default()),
        Cell::from(opt(row.finish_position)),
    ];
    cells.extend(row.cells.iter().map(score_cell));
    Row::new(cells)
}

fn score_cell(cell: &ScoreCell) -> Cell<'static> {
    match cell.state {
        CellState::Eliminated => {
            Cell::from("").style(Style::default().bg(hex_color(&cell.background)))
        }
        CellState::Chopped => Cell::from(format_score(cell.score))
            .style(cell_style(&cell.background, cell.text).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
        CellState::Played | CellState::Pending => {
            Cell::from(format_score(cell.score)).style(cell_style(&cell.background, cell.text))
        }
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
