// Sleeper fantasy API client with a SQLite-backed TTL cache.
//
// Every GET goes through `get_json`, which serves a cached body while it is
// younger than the configured TTL and otherwise fetches and re-caches.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use guillotine_core::model::MAX_WEEK;
use guillotine_core::season::raw::{
    DraftPick, LeagueUser, Matchup, PlayerDirectory, RawSeason, Roster, Transaction,
};

use crate::config::SleeperConfig;
use crate::db::Database;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SleeperError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueSettings {
    /// Current matchup week.
    #[serde(default)]
    pub leg: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueMetadata {
    /// Sent as a string or a number depending on the league's age.
    #[serde(default)]
    pub latest_league_winner_roster_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub settings: Option<LeagueSettings>,
    #[serde(default)]
    pub metadata: Option<LeagueMetadata>,
}

impl LeagueInfo {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    /// The week the league is on: 17 once complete, the settings week when it
    /// is in range, otherwise 1.
    pub fn current_week(&self) -> u32 {
        if self.status() == "complete" {
            return MAX_WEEK;
        }
        match self.settings.as_ref().and_then(|s| s.leg) {
            Some(leg) if (1..=MAX_WEEK).contains(&leg) => leg,
            _ => 1,
        }
    }

    pub fn winner_roster_id(&self) -> Option<u32> {
        let value = self.metadata.as_ref()?.latest_league_winner_roster_id.as_ref()?;
        let id = match value {
            serde_json::Value::Number(n) => n.as_u64().map(|n| n as u32),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        id.filter(|id| *id != 0)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Draft {
    draft_id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
    cache_ttl_secs: u64,
    db: Arc<Database>,
}

impl SleeperClient {
    pub fn new(config: &SleeperConfig, db: Arc<Database>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("failed to build HTTP client with timeout ({e}); using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache_ttl_secs: config.cache_ttl_secs,
            db,
        }
    }

    /// Full URL for an API path such as `/league/123`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SleeperError> {
        let url = self.url(path);
        let now = Utc::now();

        match self.db.get_cached(&url) {
            Ok(Some(entry)) if entry.is_fresh(self.cache_ttl_secs, now) => {
                debug!(%url, "sleeper cache hit");
                return decode(&url, &entry.body);
            }
            Ok(_) => {}
            Err(e) => warn!(%url, "sleeper cache read failed: {e:#}"),
        }

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| SleeperError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SleeperError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(|source| SleeperError::Request {
            url: url.clone(),
            source,
        })?;

        let parsed = decode(&url, &body)?;
        if let Err(e) = self.db.put_cached(&url, &body, now) {
            warn!(%url, "sleeper cache write failed: {e:#}");
        }
        debug!(%url, bytes = body.len(), "sleeper fetch");
        Ok(parsed)
    }

    /// Drop every cached response so the next requests hit the network.
    pub fn clear_cache(&self) {
        match self.db.clear_cache() {
            Ok(n) => info!(entries = n, "cleared sleeper cache"),
            Err(e) => warn!("failed to clear sleeper cache: {e:#}"),
        }
    }

    pub async fn league(&self, league_id: &str) -> Result<LeagueInfo, SleeperError> {
        self.get_json(&format!("/league/{league_id}")).await
    }

    pub async fn users(&self, league_id: &str) -> Result<Vec<LeagueUser>, SleeperError> {
        self.get_json(&format!("/league/{league_id}/users")).await
    }

    pub async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, SleeperError> {
        self.get_json(&format!("/league/{league_id}/rosters")).await
    }

    pub async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<Matchup>, SleeperError> {
        self.get_json(&format!("/league/{league_id}/matchups/{week}")).await
    }

    pub async fn transactions(
        &self,
        league_id: &str,
        week: u32,
    ) -> Result<Vec<Transaction>, SleeperError> {
        self.get_json(&format!("/league/{league_id}/transactions/{week}")).await
    }

    /// The full NFL player directory. Large; leans on the response cache.
    pub async fn players(&self) -> Result<PlayerDirectory, SleeperError> {
        self.get_json("/players/nfl").await
    }

    /// Picks of the league's first draft. Empty when no draft exists.
    pub async fn draft_picks(&self, league_id: &str) -> Result<Vec<DraftPick>, SleeperError> {
        let drafts: Vec<Draft> = self.get_json(&format!("/league/{league_id}/drafts")).await?;
        match drafts.first() {
            Some(draft) => self.get_json(&format!("/draft/{}/picks", draft.draft_id)).await,
            None => Ok(Vec::new()),
        }
    }

    /// Fetch everything season processing needs through `current_week`.
    ///
    /// A week whose matchups cannot be fetched ends the scan (it has not been
    /// played); a week whose transactions fail is skipped.
    pub async fn fetch_raw_season(
        &self,
        league_id: &str,
        season: i32,
        current_week: u32,
        league: &LeagueInfo,
    ) -> Result<RawSeason, SleeperError> {
        let mut raw = RawSeason {
            season,
            users: self.users(league_id).await?,
            rosters: self.rosters(league_id).await?,
            winner_roster_id: league.winner_roster_id(),
            ..Default::default()
        };

        for week in 1..=current_week.min(MAX_WEEK) {
            match self.matchups(league_id, week).await {
                Ok(matchups) => {
                    raw.matchups.insert(week, matchups);
                }
                Err(e) => {
                    debug!(week, "no matchups, ending scan: {e}");
                    break;
                }
            }
        }

        for week in 1..=current_week.min(MAX_WEEK) {
            match self.transactions(league_id, week).await {
                Ok(txns) => {
                    raw.transactions.insert(week, txns);
                }
                Err(e) => warn!(week, "skipping transactions: {e}"),
            }
        }

        raw.draft_picks = match self.draft_picks(league_id).await {
            Ok(picks) => picks,
            Err(e) => {
                warn!("draft picks unavailable: {e}");
                Vec::new()
            }
        };

        Ok(raw)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, SleeperError> {
    serde_json::from_str(body).map_err(|source| SleeperError::Decode {
        url: url.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn league(json: &str) -> LeagueInfo {
        serde_json::from_str(json).unwrap()
    }

    fn cached_client(entries: &[(&str, &str)]) -> SleeperClient {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let config = SleeperConfig {
            base_url: "http://sleeper.invalid/v1/".into(),
            cache_ttl_secs: 300,
            timeout_secs: 1,
        };
        let client = SleeperClient::new(&config, db.clone());
        for (path, body) in entries {
            db.put_cached(&client.url(path), body, Utc::now()).unwrap();
        }
        client
    }

    #[test]
    fn current_week_from_league_state() {
        assert_eq!(league(r#"{"status": "complete", "settings": {"leg": 3}}"#).current_week(), 17);
        assert_eq!(league(r#"{"status": "in_season", "settings": {"leg": 9}}"#).current_week(), 9);
        assert_eq!(league(r#"{"status": "in_season", "settings": {"leg": 18}}"#).current_week(), 1);
        assert_eq!(league(r#"{"status": "in_season"}"#).current_week(), 1);
        assert_eq!(league("{}").current_week(), 1);
    }

    #[test]
    fn winner_roster_id_accepts_string_or_number() {
        let s = league(r#"{"metadata": {"latest_league_winner_roster_id": "7"}}"#);
        assert_eq!(s.winner_roster_id(), Some(7));
        let n = league(r#"{"metadata": {"latest_league_winner_roster_id": 4}}"#);
        assert_eq!(n.winner_roster_id(), Some(4));
        let none = league(r#"{"metadata": {"latest_league_winner_roster_id": null}}"#);
        assert_eq!(none.winner_roster_id(), None);
        assert_eq!(league("{}").winner_roster_id(), None);
    }

    #[test]
    fn url_strips_trailing_slash_from_base() {
        let client = cached_client(&[]);
        assert_eq!(client.url("/league/1"), "http://sleeper.invalid/v1/league/1");
    }

    #[tokio::test]
    async fn fresh_cache_entries_are_served_without_network() {
        let client = cached_client(&[(
            "/league/L1/users",
            r#"[{"user_id": "u1", "display_name": "Ann"}]"#,
        )]);
        let users = client.users("L1").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name(), "Ann");
    }

    #[tokio::test]
    async fn cached_garbage_is_a_decode_error() {
        let client = cached_client(&[("/league/L1/rosters", "not json")]);
        let err = client.rosters("L1").await.unwrap_err();
        assert!(matches!(err, SleeperError::Decode { .. }));
    }

    #[tokio::test]
    async fn raw_season_assembled_from_cache() {
        let client = cached_client(&[
            ("/league/L1/users", r#"[{"user_id": "u1", "display_name": "Ann"}, {"user_id": "u2", "username": "ben"}]"#),
            ("/league/L1/rosters", r#"[{"roster_id": 1, "owner_id": "u1"}, {"roster_id": 2, "owner_id": "u2"}]"#),
            ("/league/L1/matchups/1", r#"[{"roster_id": 1, "points": 101.2}, {"roster_id": 2, "points": 88.0}]"#),
            ("/league/L1/transactions/1", r#"[{"type": "waiver", "status": "complete", "roster_ids": [1], "settings": {"waiver_bid": 12}, "adds": {"p1": 1}}]"#),
            ("/league/L1/drafts", r#"[{"draft_id": "D1"}]"#),
            ("/draft/D1/picks", r#"[{"round": 1, "roster_id": 2, "pick_no": 1}]"#),
        ]);
        let info = league(r#"{"status": "in_season", "settings": {"leg": 1}}"#);
        let raw = client.fetch_raw_season("L1", 2026, 1, &info).await.unwrap();
        assert_eq!(raw.season, 2026);
        assert_eq!(raw.users.len(), 2);
        assert_eq!(raw.rosters.len(), 2);
        assert_eq!(raw.matchups[&1].len(), 2);
        assert_eq!(raw.transactions[&1][0].bid(), Some(12));
        assert_eq!(raw.draft_picks[0].pick_no, Some(1));
        assert_eq!(raw.winner_roster_id, None);
    }

    #[tokio::test]
    async fn player_directory_tolerates_sparse_entries() {
        let client = cached_client(&[(
            "/players/nfl",
            r#"{"4046": {"first_name": "Patrick", "last_name": "Mahomes", "position": "QB", "team": "KC"},
                "DEN": {"first_name": "Denver", "last_name": "Broncos", "position": null}}"#,
        )]);
        let players = client.players().await.unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players["4046"].position.as_deref(), Some("QB"));
        assert_eq!(players["DEN"].position, None);
    }
}
