// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app orchestrator last
// pushed. `UiUpdate` messages arrive over an mpsc channel; the TUI applies
// them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use guillotine_core::profile::ManagerProfile;
use guillotine_core::recap::SeasonRecap;
use guillotine_core::standings::StandingsTable;

use crate::protocol::{LeagueOverview, SeasonsInfo, TabId, UiUpdate, UserCommand};
use crate::repository::SeasonActivity;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A season load in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loading {
    pub season: i32,
    pub week: Option<u32>,
}

/// Activity history received for a season. `activity` is `None` when the
/// season has none.
#[derive(Debug, Clone)]
pub struct ActivityPanel {
    pub season: i32,
    pub activity: Option<SeasonActivity>,
}

/// TUI-local state that mirrors the app state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    pub seasons: Option<SeasonsInfo>,
    /// Last table received. Kept while a reload is in flight.
    pub table: Option<StandingsTable>,
    pub week_override: Option<u32>,
    pub loading: Option<Loading>,
    /// Last load error, export result, or notice.
    pub message: Option<String>,
    /// First row shown in the active tab's scrolling list.
    pub scroll_offset: usize,
    pub active_tab: TabId,
    pub recap: Option<SeasonRecap>,
    pub profile: Option<ManagerProfile>,
    /// Highlighted entry of `profile_names()`.
    pub profile_cursor: usize,
    pub activity: Option<ActivityPanel>,
    pub league: Option<LeagueOverview>,
}

impl ViewState {
    /// Managers of the current table, alphabetically.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .table
            .iter()
            .flat_map(|t| t.rows.iter().map(|r| r.user_name.as_str()))
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Number of scrollable rows in the active tab.
    pub fn scroll_len(&self) -> usize {
        match self.active_tab {
            TabId::Standings => self.table.as_ref().map_or(0, |t| t.rows.len()),
            TabId::Recap => self.recap.as_ref().map_or(0, |r| r.weekly_highlights.len()),
            TabId::Profile => self.profile.as_ref().map_or(0, |p| p.seasons.len()),
            TabId::Activity => self
                .activity
                .as_ref()
                .and_then(|p| p.activity.as_ref())
                .map_or(0, |a| a.transactions.awards.len().max(a.chopped_players.len())),
            TabId::League => self.league.as_ref().map_or(0, |l| l.average_finishes.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Seasons(info) => {
            state.seasons = Some(info);
        }
        UiUpdate::Loading { season, week } => {
            state.loading = Some(Loading { season, week });
            state.message = None;
        }
        UiUpdate::Standings {
            table,
            week_override,
        } => {
            let switched = state.table.as_ref().map(|t| t.season) != Some(table.season);
            if switched {
                state.scroll_offset = 0;
                state.profile_cursor = 0;
            }
            state.table = Some(*table);
            state.scroll_offset = state.scroll_offset.min(state.scroll_len().saturating_sub(1));
            state.week_override = week_override;
            state.loading = None;
        }
        UiUpdate::Recap(recap) => {
            state.recap = Some(*recap);
        }
        UiUpdate::Profile(profile) => {
            state.profile = Some(*profile);
        }
        UiUpdate::Activity { season, activity } => {
            state.activity = Some(ActivityPanel {
                season,
                activity: activity.map(|a| *a),
            });
        }
        UiUpdate::League(overview) => {
            state.league = Some(*overview);
        }
        UiUpdate::LoadFailed { season, message } => {
            state.loading = None;
            state.table = None;
            state.recap = None;
            state.message = Some(format!("Season {season} unavailable: {message}"));
        }
        UiUpdate::ExportComplete(path) => {
            state.message = Some(format!("Exported {}", path.display()));
        }
        UiUpdate::Notice(text) => {
            state.message = Some(text);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_tab_bar(frame, &layout, state);
    match state.active_tab {
        TabId::Standings => {
            widgets::standings::render(frame, layout.standings, state);
            widgets::summary::render(frame, layout.summary, state);
        }
        TabId::Recap => widgets::recap::render(frame, layout.main, state),
        TabId::Profile => widgets::profile::render(frame, layout.main, state),
        TabId::Activity => widgets::activity::render(frame, layout.main, state),
        TabId::League => widgets::league::render(frame, layout.main, state),
    }
    render_help_bar(frame, &layout, state);
}

fn render_tab_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(widgets::status_bar::tab_spans(state.active_tab));
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, layout.tab_bar);
}

const HELP_TEXT: &str = " ←/→:Season | -/+:Week | 0:Current week | 1-5/Tab:View | ↑/↓:Scroll | Enter:Profile | r:Refresh | e:Export | q:Quit";

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let line = match &state.message {
        Some(message) => Line::from(vec![
            Span::styled(format!(" {message}"), Style::default().fg(Color::Yellow)),
        ]),
        None => Line::from(vec![Span::styled(
            HELP_TEXT,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )]),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits or the app closes the update channel.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down.
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = matches!(cmd, UserCommand::Quit);
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use guillotine_core::model::{Manager, SeasonData, SeasonStatus, WeeklyStat};
    use guillotine_core::recap::build_recap;
    use guillotine_core::standings::{build_standings, StandingsContext};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    /// A small two-week season with one chopped manager.
    pub(crate) fn sample_table() -> StandingsTable {
        let mut ann = Manager::new("Ann");
        ann.set_score(1, Some(120.0));
        ann.set_score(2, Some(110.0));
        ann.faab_remaining = 800;
        ann.avg_pos_above_chop = Some(1.5);
        let mut ben = Manager::new("Ben");
        ben.set_score(1, Some(100.0));
        ben.set_score(2, Some(95.0));
        ben.faab_remaining = 650;
        ben.avg_pos_above_chop = Some(0.5);
        let mut cal = Manager::new("Cal");
        cal.set_score(1, Some(70.0));
        cal.chop_week = Some(1);
        cal.faab_remaining = 0;
        let season = SeasonData {
            season: 2024,
            managers: vec![cal, ben, ann],
            weekly_stats: Default::default(),
            current_week: 2,
            champion: None,
            status: Some(SeasonStatus::Other("in_season".into())),
            starting_faab: Some(1000),
        };
        build_standings(
            &season,
            &StandingsContext {
                reigning_champion: Some("Ben".into()),
            },
        )
    }

    /// Recap of the same two-week season as `sample_table`.
    pub(crate) fn sample_recap() -> SeasonRecap {
        let mut ann = Manager::new("Ann");
        ann.set_score(1, Some(120.0));
        ann.set_score(2, Some(110.0));
        let mut cal = Manager::new("Cal");
        cal.set_score(1, Some(70.0));
        cal.chop_week = Some(1);
        let mut season = SeasonData {
            season: 2024,
            managers: vec![cal, ann],
            weekly_stats: Default::default(),
            current_week: 2,
            champion: None,
            status: None,
            starting_faab: Some(1000),
        };
        season.weekly_stats.insert(
            "1".into(),
            WeeklyStat {
                high_score: Some(120.0),
                percentile_75: None,
                median: Some(95.0),
                percentile_25: None,
                chop_score: Some(70.0),
                chop_differential: Some(50.0),
            },
        );
        build_recap(&season)
    }

    pub(crate) fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn view_state_default_is_empty() {
        let state = ViewState::default();
        assert!(state.seasons.is_none());
        assert!(state.table.is_none());
        assert!(state.loading.is_none());
        assert!(state.message.is_none());
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn loading_then_standings() {
        let mut state = ViewState::default();
        state.message = Some("old".into());
        apply_ui_update(&mut state, UiUpdate::Loading { season: 2024, week: Some(2) });
        assert_eq!(state.loading, Some(Loading { season: 2024, week: Some(2) }));
        assert!(state.message.is_none());

        apply_ui_update(
            &mut state,
            UiUpdate::Standings {
                table: Box::new(sample_table()),
                week_override: Some(2),
            },
        );
        assert!(state.loading.is_none());
        assert_eq!(state.week_override, Some(2));
        assert_eq!(state.table.as_ref().unwrap().season, 2024);
    }

    #[test]
    fn new_season_resets_scroll() {
        let mut state = ViewState::default();
        state.scroll_offset = 2;
        let mut table = sample_table();
        table.season = 2023;
        state.table = Some(table);
        apply_ui_update(
            &mut state,
            UiUpdate::Standings {
                table: Box::new(sample_table()),
                week_override: None,
            },
        );
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn load_failure_clears_table_and_reports() {
        let mut state = ViewState::default();
        state.table = Some(sample_table());
        apply_ui_update(
            &mut state,
            UiUpdate::LoadFailed {
                season: 2030,
                message: "season 2030 is not available".into(),
            },
        );
        assert!(state.table.is_none());
        assert!(state.message.as_deref().unwrap().starts_with("Season 2030 unavailable"));
    }

    #[test]
    fn export_and_notice_messages() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ExportComplete(PathBuf::from("exports/x.csv")));
        assert_eq!(state.message.as_deref(), Some("Exported exports/x.csv"));
        apply_ui_update(&mut state, UiUpdate::Notice("hello".into()));
        assert_eq!(state.message.as_deref(), Some("hello"));
    }

    #[test]
    fn tab_payloads_are_stored() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Activity {
                season: 2023,
                activity: None,
            },
        );
        let panel = state.activity.as_ref().unwrap();
        assert_eq!(panel.season, 2023);
        assert!(panel.activity.is_none());

        apply_ui_update(
            &mut state,
            UiUpdate::League(Box::new(LeagueOverview {
                rules: Default::default(),
                average_finishes: Vec::new(),
            })),
        );
        assert!(state.league.is_some());
    }

    #[test]
    fn load_failure_drops_stale_recap() {
        let mut state = ViewState::default();
        state.recap = Some(sample_recap());
        apply_ui_update(
            &mut state,
            UiUpdate::LoadFailed {
                season: 2024,
                message: "offline".into(),
            },
        );
        assert!(state.recap.is_none());
    }

    #[test]
    fn profile_names_are_alphabetical() {
        let state = ViewState {
            table: Some(sample_table()),
            ..Default::default()
        };
        assert_eq!(state.profile_names(), vec!["Ann", "Ben", "Cal"]);
    }

    #[test]
    fn each_tab_renders() {
        let mut state = ViewState {
            table: Some(sample_table()),
            recap: Some(sample_recap()),
            ..Default::default()
        };
        for tab in TabId::ALL {
            state.active_tab = tab;
            let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
            let text = buffer_text(&terminal);
            assert!(text.contains("1:Standings"), "{tab:?}");
        }
    }

    #[test]
    fn full_frame_renders() {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let mut state = ViewState::default();
        state.seasons = Some(SeasonsInfo {
            league_name: "The Guillotine".into(),
            seasons: vec![2023, 2024],
            selected: 2024,
        });
        state.table = Some(sample_table());
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("The Guillotine"));
        assert!(text.contains("Ann"));
        assert!(text.contains("q:Quit"));
    }

    #[test]
    fn help_bar_shows_message_when_present() {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let state = ViewState {
            message: Some("Exported exports/standings_2024_w2.csv".into()),
            ..Default::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Exported exports/standings_2024_w2.csv"));
        assert!(!text.contains("q:Quit"));
    }
}
