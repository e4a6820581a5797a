// League tab: house rules and every manager's finish by season.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use guillotine_core::profile::AverageFinish;

use super::format_score;
use crate::config::LeagueRules;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(overview) = &state.league else {
        let block = Block::default().borders(Borders::ALL).title("League");
        frame.render_widget(Paragraph::new("Loading league history...").block(block), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(area);

    let rules = Paragraph::new(rule_lines(&overview.rules))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Rules"));
    frame.render_widget(rules, rows[0]);
    frame.render_widget(finish_table(&overview.average_finishes, state.scroll_offset), rows[1]);
}

fn ordinal(place: usize) -> String {
    let suffix = match (place % 10, place % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{place}{suffix}")
}

/// `1st $700  2nd $150  3rd $50`.
pub fn prize_line(prize_pool: &[u32]) -> String {
    if prize_pool.is_empty() {
        return "-".to_string();
    }
    prize_pool
        .iter()
        .enumerate()
        .map(|(i, amount)| format!("{} ${amount}", ordinal(i + 1)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn rule_lines(rules: &LeagueRules) -> Vec<Line<'static>> {
    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    };
    let or_dash = |text: &str| {
        if text.trim().is_empty() {
            "-".to_string()
        } else {
            text.trim().to_string()
        }
    };
    vec![
        Line::from(vec![
            label("Prizes   "),
            Span::styled(prize_line(&rules.prize_pool), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![label("Waivers  "), Span::raw(or_dash(&rules.waiver_time))]),
        Line::from(vec![label("Chop     "), Span::raw(or_dash(&rules.chop_rules))]),
        Line::from(vec![label("Bench    "), Span::raw(or_dash(&rules.bench_expansion))]),
    ]
}

fn finish_table(finishes: &[AverageFinish], scroll_offset: usize) -> Table<'static> {
    let mut seasons: Vec<i32> = finishes
        .iter()
        .flat_map(|f| f.finishes.keys().copied())
        .collect();
    seasons.sort_unstable();
    seasons.dedup();

    let mut header_cells = vec![Cell::from("Manager"), Cell::from("Avg")];
    header_cells.extend(seasons.iter().map(|s| Cell::from(s.to_string())));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = finishes
        .iter()
        .skip(scroll_offset)
        .map(|f| {
            let mut cells = vec![
                Cell::from(f.user_name.clone()),
                Cell::from(format_score(f.average_finish)),
            ];
            cells.extend(seasons.iter().map(|s| match f.finishes.get(s) {
                Some(Some(1)) => Cell::from("1").style(Style::default().fg(Color::Yellow)),
                Some(Some(place)) => Cell::from(place.to_string()),
                // Still alive in an unfinished season.
                Some(None) => Cell::from("*"),
                None => Cell::from("-"),
            }));
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = [Constraint::Length(18), Constraint::Length(6)]
        .into_iter()
        .chain(seasons.iter().map(|_| Constraint::Length(5)))
        .collect();
    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("Average Finish"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::protocol::LeagueOverview;
    use crate::tui::tests::buffer_text;

    #[test]
    fn prize_places_are_ordinal() {
        assert_eq!(prize_line(&[700, 150, 50]), "1st $700  2nd $150  3rd $50");
        assert_eq!(prize_line(&[]), "-");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn renders_rules_and_finishes() {
        let overview = LeagueOverview {
            rules: LeagueRules {
                prize_pool: vec![700, 150, 50],
                waiver_time: "Wednesdays at 9am PT".into(),
                chop_rules: String::new(),
                bench_expansion: String::new(),
            },
            average_finishes: vec![
                AverageFinish {
                    user_name: "Ann".into(),
                    finishes: BTreeMap::from([(2024, Some(1)), (2025, None)]),
                    average_finish: Some(1.0),
                },
                AverageFinish {
                    user_name: "Ben".into(),
                    finishes: BTreeMap::from([(2025, Some(4))]),
                    average_finish: Some(4.0),
                },
            ],
        };
        let state = ViewState {
            league: Some(overview),
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("1st $700"));
        assert!(text.contains("Wednesdays at 9am PT"));
        assert!(text.contains("2024"));
        assert!(text.contains("2025"));
        assert!(text.contains("1.00"));
        assert!(text.contains("4.00"));
    }
}
