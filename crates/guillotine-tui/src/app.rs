// Application orchestrator: owns the selected-season context and turns user
// commands into season loads, standings tables, recaps, profiles, and exports.
//
// Runs as its own task. Receives `UserCommand`s from the TUI, watches the
// season selection, and pushes `UiUpdate`s back.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use guillotine_core::model::{SeasonData, MAX_WEEK};
use guillotine_core::profile::{average_finishes, build_profile};
use guillotine_core::recap::build_recap;
use guillotine_core::standings::{build_standings, StandingsContext, StandingsTable};

use crate::config::Config;
use crate::export;
use crate::protocol::{LeagueOverview, SeasonsInfo, TabId, UiUpdate, UserCommand};
use crate::repository::SeasonSource;
use crate::selection::SeasonSelection;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    source: Arc<dyn SeasonSource>,
    selection: SeasonSelection,
    /// Week shown instead of the season's current week.
    pub week_override: Option<u32>,
    /// Full-season snapshots (no week override), filled on demand for the
    /// reigning-champion badge, profiles, and the league page.
    archive: HashMap<i32, SeasonData>,
    /// Last table sent to the TUI; used for export and week stepping.
    pub table: Option<StandingsTable>,
    pub active_tab: TabId,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn SeasonSource>, selection: SeasonSelection) -> Self {
        AppState {
            config,
            source,
            selection,
            week_override: None,
            archive: HashMap::new(),
            table: None,
            active_tab: TabId::default(),
        }
    }

    pub fn selected_season(&self) -> i32 {
        self.selection.current()
    }

    fn seasons_info(&self) -> SeasonsInfo {
        SeasonsInfo {
            league_name: self.config.league.name.clone(),
            seasons: self.selection.available().to_vec(),
            selected: self.selection.current(),
        }
    }

    /// The season before `season` in the configured list.
    fn previous_season(&self, season: i32) -> Option<i32> {
        self.selection
            .available()
            .iter()
            .copied()
            .filter(|s| *s < season)
            .max()
    }

    /// Full-season snapshot of `season`, loading it once.
    async fn full_season(&mut self, season: i32) -> Option<&SeasonData> {
        if !self.archive.contains_key(&season) {
            match self.source.load_season(season, None).await {
                Ok(data) => {
                    self.archive.insert(season, data);
                }
                Err(e) => {
                    warn!(season, "full season unavailable: {e}");
                    return None;
                }
            }
        }
        self.archive.get(&season)
    }

    /// Every configured season that loads, oldest first.
    async fn every_season(&mut self) -> Vec<SeasonData> {
        let mut out = Vec::new();
        for season in self.selection.available().to_vec() {
            if let Some(data) = self.full_season(season).await {
                out.push(data.clone());
            }
        }
        out
    }

    /// Champion of the season preceding `season`.
    async fn reigning_champion(&mut self, season: i32) -> Option<String> {
        let previous = self.previous_season(season)?;
        self.full_season(previous).await?.champion.clone()
    }

    /// Week the next load should use after shifting by `delta`.
    fn shifted_week(&self, delta: i32) -> u32 {
        let base = self
            .week_override
            .or_else(|| self.table.as_ref().map(|t| t.visible_weeks))
            .unwrap_or(1) as i32;
        (base + delta).clamp(1, MAX_WEEK as i32) as u32
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the selected season and push its standings to the TUI.
pub async fn load_selected(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let season = state.selected_season();
    let week = state.week_override;
    let _ = ui_tx.send(UiUpdate::Loading { season, week }).await;

    let data = match state.source.load_season(season, week).await {
        Ok(data) => data,
        Err(e) => {
            warn!(season, "season load failed: {e}");
            state.table = None;
            let _ = ui_tx
                .send(UiUpdate::LoadFailed {
                    season,
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    if week.is_none() {
        state.archive.insert(season, data.clone());
    }
    let ctx = StandingsContext {
        reigning_champion: state.reigning_champion(season).await,
    };
    let table = build_standings(&data, &ctx);
    info!(
        season,
        weeks = table.visible_weeks,
        managers = table.rows.len(),
        "standings ready"
    );
    state.table = Some(table.clone());
    let _ = ui_tx
        .send(UiUpdate::Standings {
            table: Box::new(table),
            week_override: state.week_override,
        })
        .await;
    let _ = ui_tx.send(UiUpdate::Recap(Box::new(build_recap(&data)))).await;

    if state.active_tab == TabId::Activity {
        load_activity(state, ui_tx).await;
    }
}

/// Load transaction and chopped-player history for the selected season.
async fn load_activity(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let season = state.selected_season();
    let update = match state.source.load_activity(season).await {
        Ok(activity) => UiUpdate::Activity {
            season,
            activity: activity.map(Box::new),
        },
        Err(e) => {
            warn!(season, "activity load failed: {e}");
            UiUpdate::Notice(format!("Season {season} activity unavailable: {e}"))
        }
    };
    let _ = ui_tx.send(update).await;
}

async fn send_league(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let seasons = state.every_season().await;
    let overview = LeagueOverview {
        rules: state.config.league.rules.clone(),
        average_finishes: average_finishes(&seasons),
    };
    let _ = ui_tx.send(UiUpdate::League(Box::new(overview))).await;
}

async fn show_profile(state: &mut AppState, user_name: &str, ui_tx: &mpsc::Sender<UiUpdate>) {
    let seasons = state.every_season().await;
    let update = match build_profile(user_name, &seasons) {
        Some(profile) => {
            info!(manager = %profile.user_name, seasons = profile.seasons.len(), "profile ready");
            UiUpdate::Profile(Box::new(profile))
        }
        None => UiUpdate::Notice(format!("No seasons found for {user_name}")),
    };
    let _ = ui_tx.send(update).await;
}

fn export_current(state: &AppState) -> anyhow::Result<Option<PathBuf>> {
    let Some(table) = &state.table else {
        return Ok(None);
    };
    let dir = PathBuf::from(&state.config.storage.export_dir);
    export::export_standings(table, &dir).map(Some)
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Next {
    Continue,
    Reload,
    Quit,
}

async fn handle_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> Next {
    match cmd {
        UserCommand::PreviousSeason | UserCommand::NextSeason => {
            let delta = if cmd == UserCommand::NextSeason { 1 } else { -1 };
            // A real change arrives through the selection watch.
            if let Err(e) = state.selection.step(delta) {
                warn!("season change failed: {e:#}");
                let _ = ui_tx.send(UiUpdate::Notice(format!("Season change failed: {e}"))).await;
            }
            Next::Continue
        }
        UserCommand::ShiftWeek(delta) => {
            let week = state.shifted_week(delta);
            if state.week_override == Some(week) {
                return Next::Continue;
            }
            state.week_override = Some(week);
            Next::Reload
        }
        UserCommand::ClearWeek => {
            if state.week_override.take().is_some() {
                Next::Reload
            } else {
                Next::Continue
            }
        }
        UserCommand::SwitchTab(tab) => {
            state.active_tab = tab;
            info!("Switched to tab: {:?}", tab);
            match tab {
                TabId::Activity => load_activity(state, ui_tx).await,
                TabId::League => send_league(state, ui_tx).await,
                TabId::Standings | TabId::Recap | TabId::Profile => {}
            }
            Next::Continue
        }
        UserCommand::ShowProfile(user_name) => {
            show_profile(state, &user_name, ui_tx).await;
            Next::Continue
        }
        UserCommand::Refresh => {
            info!("refresh requested");
            state.source.invalidate();
            state.archive.clear();
            Next::Reload
        }
        UserCommand::Export => {
            let update = match export_current(state) {
                Ok(Some(path)) => UiUpdate::ExportComplete(path),
                Ok(None) => UiUpdate::Notice("Nothing to export yet".into()),
                Err(e) => {
                    warn!("export failed: {e:#}");
                    UiUpdate::Notice(format!("Export failed: {e}"))
                }
            };
            let _ = ui_tx.send(update).await;
            Next::Continue
        }
        UserCommand::Quit => Next::Quit,
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI quits or closes its channel.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    let mut selection_rx: watch::Receiver<i32> = state.selection.subscribe();

    let _ = ui_tx.send(UiUpdate::Seasons(state.seasons_info())).await;
    load_selected(&mut state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    info!("Command channel closed, shutting down");
                    break;
                };
                match handle_command(&mut state, cmd, &ui_tx).await {
                    Next::Continue => {}
                    Next::Reload => load_selected(&mut state, &ui_tx).await,
                    Next::Quit => {
                        info!("Quit requested");
                        break;
                    }
                }
            }

            changed = selection_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let season = *selection_rx.borrow_and_update();
                info!(season, "season selection changed");
                state.week_override = None;
                let _ = ui_tx.send(UiUpdate::Seasons(state.seasons_info())).await;
                load_selected(&mut state, &ui_tx).await;
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
