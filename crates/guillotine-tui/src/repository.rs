// Season repository: serves historical seasons from bundled JSON files and
// live seasons from the Sleeper API.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use guillotine_core::model::{SeasonData, SeasonStatus, MAX_WEEK};
use guillotine_core::season::chopped::{chopped_players, ChoppedPlayer};
use guillotine_core::season::raw::PlayerDirectory;
use guillotine_core::season::transactions::{season_transactions, SeasonTransactions};
use guillotine_core::season::{placeholder_season, process_season};

use crate::config::Config;
use crate::sleeper::{SleeperClient, SleeperError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("season {0} is not available")]
    SeasonNotAvailable(i32),

    #[error("failed to read season file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid season file {path}: {source}")]
    InvalidSeasonFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sleeper(#[from] SleeperError),
}

/// Seasons the dashboard can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonList {
    /// Ascending.
    pub seasons: Vec<i32>,
    pub current: Option<i32>,
}

/// Waiver awards and chopped rosters for a live season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonActivity {
    pub season: i32,
    pub current_week: u32,
    pub transactions: SeasonTransactions,
    pub chopped_players: Vec<ChoppedPlayer>,
}

/// Where season snapshots come from. The app only talks to this seam, so
/// tests substitute an in-memory source.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    async fn list_seasons(&self) -> SeasonList;

    /// Load `season`. `week` overrides the snapshot's current week and is
    /// clamped to 1..=17.
    async fn load_season(&self, season: i32, week: Option<u32>)
        -> Result<SeasonData, RepositoryError>;

    /// Transaction and chopped-player history for `season`. `None` when the
    /// season only exists as an archived file, which carries no rosters.
    async fn load_activity(&self, season: i32) -> Result<Option<SeasonActivity>, RepositoryError>;

    /// Forget anything cached so the next load sees fresh data.
    fn invalidate(&self) {}
}

pub struct SeasonRepository {
    config: Config,
    client: SleeperClient,
}

impl SeasonRepository {
    pub fn new(config: Config, client: SleeperClient) -> Self {
        Self { config, client }
    }

    fn season_file(&self, season: i32) -> PathBuf {
        PathBuf::from(&self.config.storage.data_dir).join(format!("{season}.json"))
    }

    async fn load_historical(
        &self,
        season: i32,
        week: Option<u32>,
    ) -> Result<SeasonData, RepositoryError> {
        let path = self.season_file(season);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RepositoryError::Io {
                path: path.clone(),
                source,
            })?;
        let mut data = SeasonData::from_json(&text)
            .map_err(|source| RepositoryError::InvalidSeasonFile { path, source })?;
        if let Some(week) = week {
            data.current_week = clamp_week(week);
        }
        Ok(data)
    }

    async fn load_live(
        &self,
        season: i32,
        league_id: &str,
        week: Option<u32>,
    ) -> Result<SeasonData, RepositoryError> {
        let starting_faab = self.config.league.starting_faab;
        let league = self.client.league(league_id).await?;
        let status = SeasonStatus::from(league.status().to_string());

        if status.is_pre_season() {
            info!(season, status = status.as_str(), "league has not started scoring");
            let users = self.client.users(league_id).await?;
            return Ok(placeholder_season(season, &users, starting_faab, status));
        }

        let current_week = week.map(clamp_week).unwrap_or_else(|| league.current_week());
        let raw = self
            .client
            .fetch_raw_season(league_id, season, current_week, &league)
            .await?;
        let mut data = process_season(&raw, current_week, starting_faab);
        data.status = Some(status);
        Ok(data)
    }

    async fn load_live_activity(
        &self,
        season: i32,
        league_id: &str,
    ) -> Result<SeasonActivity, RepositoryError> {
        let league = self.client.league(league_id).await?;
        if SeasonStatus::from(league.status().to_string()).is_pre_season() {
            return Ok(SeasonActivity {
                season,
                ..Default::default()
            });
        }

        let current_week = league.current_week();
        let raw = self
            .client
            .fetch_raw_season(league_id, season, current_week, &league)
            .await?;
        let data = process_season(&raw, current_week, self.config.league.starting_faab);
        let players = match self.client.players().await {
            Ok(players) => players,
            Err(e) => {
                warn!(season, "player directory unavailable, using ids: {e}");
                PlayerDirectory::new()
            }
        };

        let activity = SeasonActivity {
            season,
            current_week,
            transactions: season_transactions(&raw, current_week, &players),
            chopped_players: chopped_players(&raw, &data, &players),
        };
        info!(
            season,
            awards = activity.transactions.awards.len(),
            chopped_players = activity.chopped_players.len(),
            "loaded season activity"
        );
        Ok(activity)
    }
}

#[async_trait]
impl SeasonSource for SeasonRepository {
    async fn list_seasons(&self) -> SeasonList {
        SeasonList {
            seasons: self.config.all_seasons(),
            current: self.config.current_season(),
        }
    }

    async fn load_season(
        &self,
        season: i32,
        week: Option<u32>,
    ) -> Result<SeasonData, RepositoryError> {
        if self.config.is_historical(season) {
            return self.load_historical(season, week).await;
        }
        match self.config.league_id(season) {
            Some(league_id) => self.load_live(season, league_id, week).await,
            None => {
                warn!(season, "requested season is not configured");
                Err(RepositoryError::SeasonNotAvailable(season))
            }
        }
    }

    async fn load_activity(&self, season: i32) -> Result<Option<SeasonActivity>, RepositoryError> {
        if self.config.is_historical(season) {
            return Ok(None);
        }
        match self.config.league_id(season) {
            Some(league_id) => self.load_live_activity(season, league_id).await.map(Some),
            None => Err(RepositoryError::SeasonNotAvailable(season)),
        }
    }

    fn invalidate(&self) {
        self.client.clear_cache();
    }
}

/// Clamp a requested week into the playable range.
pub fn clamp_week(week: u32) -> u32 {
    week.clamp(1, MAX_WEEK)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
