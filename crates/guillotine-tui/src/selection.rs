// Selected-season context shared by the app loop and the view.
//
// The selection is persisted in the `app_state` table and published through
// a watch channel so every subscriber sees the latest choice.

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::db::Database;

const SELECTED_SEASON_KEY: &str = "selected_season";

pub struct SeasonSelection {
    db: Arc<Database>,
    available: Vec<i32>,
    tx: watch::Sender<i32>,
}

impl SeasonSelection {
    /// Restore the persisted selection, falling back to `current` when
    /// nothing (or an unconfigured season) was saved.
    pub fn restore(db: Arc<Database>, available: Vec<i32>, current: i32) -> Self {
        let persisted = match db.load_state(SELECTED_SEASON_KEY) {
            Ok(value) => value.and_then(|v| v.as_i64()).map(|s| s as i32),
            Err(e) => {
                warn!("failed to read persisted season: {e:#}");
                None
            }
        };
        let initial = match persisted {
            Some(season) if available.contains(&season) => season,
            Some(season) => {
                warn!(season, "persisted season no longer configured; using {current}");
                current
            }
            None => current,
        };
        let (tx, _rx) = watch::channel(initial);
        Self { db, available, tx }
    }

    pub fn current(&self) -> i32 {
        *self.tx.borrow()
    }

    pub fn available(&self) -> &[i32] {
        &self.available
    }

    pub fn subscribe(&self) -> watch::Receiver<i32> {
        self.tx.subscribe()
    }

    /// Select `season`, persist it, and notify subscribers. Reselecting the
    /// current season is a no-op.
    pub fn select(&self, season: i32) -> Result<()> {
        if !self.available.contains(&season) {
            bail!("season {season} is not configured");
        }
        if self.current() == season {
            return Ok(());
        }
        self.db
            .save_state(SELECTED_SEASON_KEY, &serde_json::json!(season))?;
        self.tx.send_replace(season);
        info!(season, "selected season");
        Ok(())
    }

    /// Step through the available seasons by `delta`, stopping at the ends.
    pub fn step(&self, delta: i32) -> Result<i32> {
        let Some(pos) = self.available.iter().position(|s| *s == self.current()) else {
            return Ok(self.current());
        };
        let target = (pos as i64 + delta as i64).clamp(0, self.available.len() as i64 - 1) as usize;
        let season = self.available[target];
        self.select(season)?;
        Ok(season)
    }
}
