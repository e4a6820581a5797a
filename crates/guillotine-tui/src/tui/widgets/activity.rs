// Activity tab: won waiver claims and players lost to the chop.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use guillotine_core::season::chopped::ChoppedPlayer;
use guillotine_core::season::transactions::SeasonTransactions;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Activity");
    let selected = state.seasons.as_ref().map(|s| s.selected);

    let panel = state
        .activity
        .as_ref()
        .filter(|p| selected.is_none() || selected == Some(p.season));
    let Some(panel) = panel else {
        frame.render_widget(Paragraph::new("Loading activity...").block(block), area);
        return;
    };
    let Some(activity) = &panel.activity else {
        let text = format!(
            "Waiver and roster history is not available for the archived {} season.",
            panel.season
        );
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);
    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let weekly = Block::default()
        .borders(Borders::ALL)
        .title(format!("Activity {} through week {}", activity.season, activity.current_week));
    frame.render_widget(
        Paragraph::new(weekly_line(&activity.transactions)).block(weekly),
        rows[0],
    );
    frame.render_widget(award_table(&activity.transactions, state.scroll_offset), tables[0]);
    frame.render_widget(chopped_table(&activity.chopped_players, state.scroll_offset), tables[1]);
}

/// `W1 $58 (2)  W2 $0 (0) ...`: FAAB spent and claims won per week.
fn weekly_line(txns: &SeasonTransactions) -> Line<'static> {
    let mut spans = Vec::new();
    for (week, activity) in &txns.weekly {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("W{week} "),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(
            "${} ({})",
            activity.total_spent, activity.num_transactions
        )));
    }
    if spans.is_empty() {
        spans.push(Span::styled("No waiver activity yet.", Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

fn award_table(txns: &SeasonTransactions, scroll_offset: usize) -> Table<'static> {
    let rows: Vec<Row> = txns
        .awards
        .iter()
        .skip(scroll_offset)
        .map(|a| {
            let wasted = Cell::from(a.wasted.to_string());
            let wasted = if a.wasted > 0 {
                wasted.style(Style::default().fg(Color::Red))
            } else {
                wasted
            };
            Row::new(vec![
                Cell::from(a.week.to_string()),
                Cell::from(a.player_name.clone()),
                Cell::from(a.manager.clone()),
                Cell::from(a.winning_bid.to_string()),
                Cell::from(a.second_highest_bid.to_string()),
                Cell::from(a.num_bidders.to_string()),
                wasted,
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(5),
        ],
    )
    .header(header(&["Wk", "Player", "Won by", "Bid", "2nd", "Bids", "Waste"]))
    .column_spacing(1)
    .block(Block::default().borders(Borders::ALL).title("Waiver Awards"))
}

fn chopped_table(players: &[ChoppedPlayer], scroll_offset: usize) -> Table<'static> {
    let rows: Vec<Row> = players
        .iter()
        .skip(scroll_offset)
        .map(|p| {
            let weeks = p
                .events
                .iter()
                .map(|e| {
                    let starter = if e.was_starter { "*" } else { "" };
                    format!("W{}{starter}", e.week)
                })
                .collect::<Vec<_>>()
                .join(" ");
            Row::new(vec![
                Cell::from(p.player_name.clone()),
                Cell::from(p.times_chopped().to_string()),
                Cell::from(weeks),
            ])
        })
        .collect();
    Table::new(
        rows,
        [Constraint::Min(16), Constraint::Length(5), Constraint::Min(8)],
    )
    .header(header(&["Player", "Chops", "Weeks (*started)"]))
    .column_spacing(1)
    .block(Block::default().borders(Borders::ALL).title("Chopped Players"))
}
