// Raw league payloads as returned by the Sleeper API, plus the bundle of
// everything season processing needs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl LeagueUser {
    /// Display name, falling back to the username, then a synthetic name.
    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| format!("User_{}", self.user_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Matchup {
    pub roster_id: u32,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionSettings {
    /// Outer `None`: the key is absent. `Some(None)`: the key is an explicit
    /// null.
    #[serde(default, deserialize_with = "present")]
    pub waiver_bid: Option<Option<i64>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub roster_ids: Vec<u32>,
    #[serde(default)]
    pub settings: Option<TransactionSettings>,
    /// Player id to receiving roster id.
    #[serde(default)]
    pub adds: Option<BTreeMap<String, u32>>,
}

impl Transaction {
    pub fn is_waiver(&self) -> bool {
        self.kind == "waiver"
    }

    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }

    /// The bid placed. A transaction without a bid setting bid 0; an
    /// explicit null bid is `None` and never counts as a claim.
    pub fn bid(&self) -> Option<i64> {
        match self.settings.as_ref().and_then(|s| s.waiver_bid) {
            None => Some(0),
            Some(bid) => bid,
        }
    }

    /// The roster that placed the claim.
    pub fn claimant(&self) -> Option<u32> {
        self.roster_ids.first().copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DraftPick {
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub pick_no: Option<u32>,
}

/// An NFL player from the league-wide player directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Player id to player, as served by `/players/nfl`.
pub type PlayerDirectory = HashMap<String, Player>;

/// "First Last (POS)", dropping the position when unknown and falling back to
/// "Player <id>" for ids missing from the directory.
pub fn player_name(players: &PlayerDirectory, player_id: &str) -> String {
    let Some(player) = players.get(player_id) else {
        return format!("Player {player_id}");
    };
    let first = player.first_name.as_deref().unwrap_or("");
    let last = player.last_name.as_deref().unwrap_or("");
    let name = format!("{first} {last}");
    let name = name.trim();
    match player.position.as_deref() {
        Some(pos) if !pos.is_empty() => format!("{name} ({pos})"),
        _ => name.to_string(),
    }
}

/// Everything fetched for one season, keyed by week where applicable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeason {
    pub season: i32,
    pub users: Vec<LeagueUser>,
    pub rosters: Vec<Roster>,
    /// Weeks with matchup data. Scanning stops at the first missing week.
    pub matchups: BTreeMap<u32, Vec<Matchup>>,
    pub transactions: BTreeMap<u32, Vec<Transaction>>,
    pub draft_picks: Vec<DraftPick>,
    pub winner_roster_id: Option<u32>,
}
