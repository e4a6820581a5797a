// Season and manager data model, as served by the league backend and stored in
// historical season files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Last week of the guillotine season. Weeks are numbered 1..=17.
pub const MAX_WEEK: u32 = 17;

/// FAAB budget every manager starts the season with.
pub const DEFAULT_STARTING_FAAB: i64 = 1000;

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// One league member and their season line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    /// Display name; unique within a season.
    pub user_name: String,
    /// Sleeper roster id, present for seasons processed from live data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub draft_position: Option<u32>,
    #[serde(default)]
    pub faab_remaining: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faab_spent: Option<i64>,
    #[serde(default)]
    pub faab_wasted: Option<i64>,
    #[serde(default)]
    pub close_calls: Option<u32>,
    /// Week the manager was eliminated. `None` means still alive.
    #[serde(default)]
    pub chop_week: Option<u32>,
    /// 1 = champion. Only set once a season has played out.
    #[serde(default)]
    pub finish_position: Option<u32>,
    #[serde(default, alias = "avg_above_chop")]
    pub avg_pos_above_chop: Option<f64>,
    /// Week number ("1".."17") to score. Missing keys and nulls mean the week
    /// has not been played.
    #[serde(default)]
    pub weekly_scores: BTreeMap<String, Option<f64>>,
}

impl Manager {
    /// Create a manager with no scores and a full FAAB budget.
    pub fn new(user_name: impl Into<String>) -> Self {
        Manager {
            user_name: user_name.into(),
            roster_id: None,
            draft_position: None,
            faab_remaining: DEFAULT_STARTING_FAAB,
            faab_spent: None,
            faab_wasted: None,
            close_calls: None,
            chop_week: None,
            finish_position: None,
            avg_pos_above_chop: None,
            weekly_scores: BTreeMap::new(),
        }
    }

    /// Whether the manager was still in the league during `week`. The chop
    /// week itself counts as alive: the manager played it.
    pub fn is_alive_at(&self, week: u32) -> bool {
        match self.chop_week {
            None => true,
            Some(chop) => chop >= week,
        }
    }

    /// Whether the manager has never been chopped.
    pub fn is_survivor(&self) -> bool {
        self.chop_week.is_none()
    }

    /// Final place in a league of `teams`: the stored finish, else derived from
    /// the chop week. Survivors place first.
    pub fn resolved_finish(&self, teams: usize) -> u32 {
        if let Some(finish) = self.finish_position {
            return finish;
        }
        match self.chop_week {
            Some(chop) => (teams as u32 + 1).saturating_sub(chop),
            None => 1,
        }
    }

    /// The stored score for `week`, ignoring eliminations.
    pub fn raw_score(&self, week: u32) -> Option<f64> {
        self.weekly_scores.get(&week.to_string()).copied().flatten()
    }

    /// The score for `week`, or `None` if the week was not played or falls
    /// after this manager's chop week.
    pub fn score(&self, week: u32) -> Option<f64> {
        if !self.is_alive_at(week) {
            return None;
        }
        self.raw_score(week)
    }

    /// Set (or clear) the score for `week`.
    pub fn set_score(&mut self, week: u32, score: Option<f64>) {
        self.weekly_scores.insert(week.to_string(), score);
    }
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// League lifecycle as reported by Sleeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeasonStatus {
    PreDraft,
    Drafting,
    /// Any other status string (`in_season`, `complete`, ...).
    Other(String),
}

impl SeasonStatus {
    /// Whether the season has not produced any scores yet.
    pub fn is_pre_season(&self) -> bool {
        matches!(self, SeasonStatus::PreDraft | SeasonStatus::Drafting)
    }

    pub fn as_str(&self) -> &str {
        match self {
            SeasonStatus::PreDraft => "pre_draft",
            SeasonStatus::Drafting => "drafting",
            SeasonStatus::Other(s) => s,
        }
    }
}

impl From<String> for SeasonStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pre_draft" => SeasonStatus::PreDraft,
            "drafting" => SeasonStatus::Drafting,
            _ => SeasonStatus::Other(s),
        }
    }
}

impl From<SeasonStatus> for String {
    fn from(status: SeasonStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Per-week summary line computed by the backend over managers alive that
/// week. All fields are null for weeks that have not been played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStat {
    #[serde(default)]
    pub high_score: Option<f64>,
    #[serde(default)]
    pub percentile_75: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub percentile_25: Option<f64>,
    #[serde(default)]
    pub chop_score: Option<f64>,
    #[serde(default)]
    pub chop_differential: Option<f64>,
}

// Archived season files were written after the season ended and carry no
// `current_week`.
fn full_season() -> u32 {
    MAX_WEEK
}

/// A full season snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: i32,
    #[serde(default)]
    pub managers: Vec<Manager>,
    #[serde(default)]
    pub weekly_stats: BTreeMap<String, WeeklyStat>,
    #[serde(default = "full_season")]
    pub current_week: u32,
    #[serde(default)]
    pub champion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SeasonStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_faab: Option<i64>,
}

impl SeasonData {
    /// Parse a season snapshot from JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Weekly stat line for `week`, if the snapshot carries one.
    pub fn weekly_stat(&self, week: u32) -> Option<&WeeklyStat> {
        self.weekly_stats.get(&week.to_string())
    }

    /// Whether the league has not started scoring yet.
    pub fn is_pre_season(&self) -> bool {
        self.status.as_ref().is_some_and(SeasonStatus::is_pre_season)
    }

    /// Look up a manager by name.
    pub fn manager(&self, user_name: &str) -> Option<&Manager> {
        self.managers.iter().find(|m| m.user_name == user_name)
    }
}
