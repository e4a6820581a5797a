// Messages exchanged between the app orchestrator and the TUI.

use std::path::PathBuf;

use guillotine_core::profile::{AverageFinish, ManagerProfile};
use guillotine_core::recap::SeasonRecap;
use guillotine_core::standings::StandingsTable;

use crate::config::LeagueRules;
use crate::repository::SeasonActivity;

/// League-level information the status bar needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonsInfo {
    pub league_name: String,
    /// Ascending.
    pub seasons: Vec<i32>,
    pub selected: i32,
}

/// Main panel tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabId {
    #[default]
    Standings,
    Recap,
    Profile,
    Activity,
    League,
}

impl TabId {
    pub const ALL: [TabId; 5] = [
        TabId::Standings,
        TabId::Recap,
        TabId::Profile,
        TabId::Activity,
        TabId::League,
    ];

    /// The tab after this one, wrapping around.
    pub fn next(self) -> TabId {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// House rules and the all-time finish table.
#[derive(Debug, Clone)]
pub struct LeagueOverview {
    pub rules: LeagueRules,
    pub average_finishes: Vec<AverageFinish>,
}

/// App orchestrator -> TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Configured seasons and the current selection.
    Seasons(SeasonsInfo),
    /// A season load started.
    Loading { season: i32, week: Option<u32> },
    /// A freshly built table for the selected season.
    Standings {
        table: Box<StandingsTable>,
        week_override: Option<u32>,
    },
    /// Recap of the snapshot the last standings were built from.
    Recap(Box<SeasonRecap>),
    Profile(Box<ManagerProfile>),
    /// `None` when the season has no transaction or roster history.
    Activity {
        season: i32,
        activity: Option<Box<SeasonActivity>>,
    },
    League(Box<LeagueOverview>),
    LoadFailed { season: i32, message: String },
    ExportComplete(PathBuf),
    /// One-line status message (errors from commands, etc.).
    Notice(String),
}

/// TUI -> app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    PreviousSeason,
    NextSeason,
    /// Move the week override by the given number of weeks.
    ShiftWeek(i32),
    ClearWeek,
    SwitchTab(TabId),
    /// Load the career profile of the named manager.
    ShowProfile(String),
    Refresh,
    Export,
    Quit,
}
