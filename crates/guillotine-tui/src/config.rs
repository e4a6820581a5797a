// Configuration loading and parsing (config/league.toml).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub sleeper: SleeperConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub name: String,
    pub starting_faab: i64,
    /// Seasons served from JSON files in `storage.data_dir`.
    pub historical_seasons: Vec<i32>,
    /// Sleeper league id per live season.
    pub league_ids: BTreeMap<i32, String>,
    pub rules: LeagueRules,
}

/// House rules shown on the league page. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueRules {
    /// Payout per finishing place, first place first.
    #[serde(default)]
    pub prize_pool: Vec<u32>,
    #[serde(default)]
    pub waiver_time: String,
    #[serde(default)]
    pub chop_rules: String,
    #[serde(default)]
    pub bench_expansion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite file. When omitted, lives in the per-user data directory.
    #[serde(default)]
    pub db_path: Option<String>,
    pub data_dir: String,
    pub export_dir: String,
}

impl Config {
    /// Every configured season, ascending and de-duplicated.
    pub fn all_seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self
            .league
            .historical_seasons
            .iter()
            .copied()
            .chain(self.league.league_ids.keys().copied())
            .collect();
        seasons.sort_unstable();
        seasons.dedup();
        seasons
    }

    /// The most recent configured season.
    pub fn current_season(&self) -> Option<i32> {
        self.all_seasons().last().copied()
    }

    pub fn is_historical(&self, season: i32) -> bool {
        self.league.historical_seasons.contains(&season)
    }

    pub fn league_id(&self, season: i32) -> Option<&str> {
        self.league.league_ids.get(&season).map(String::as_str)
    }

    /// Where the SQLite database lives.
    pub fn db_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.db_path {
            return PathBuf::from(path);
        }
        directories::ProjectDirs::from("", "", "guillotine")
            .map(|dirs| dirs.data_dir().join("guillotine.db"))
            .unwrap_or_else(|| PathBuf::from("guillotine.db"))
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    sleeper: SleeperConfig,
    storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    starting_faab: i64,
    #[serde(default)]
    historical_seasons: Vec<i32>,
    /// TOML table keys are strings; parsed into years during loading.
    #[serde(default)]
    league_ids: BTreeMap<String, String>,
    #[serde(default)]
    rules: LeagueRules,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// `base_dir`.
///
/// This does not copy defaults. Prefer `load_config()`, which does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    let mut league_ids = BTreeMap::new();
    for (key, id) in file.league.league_ids {
        let season: i32 = key.trim().parse().map_err(|_| ConfigError::ValidationError {
            field: format!("league.league_ids.{key}"),
            message: "season key must be a year".into(),
        })?;
        league_ids.insert(season, id);
    }

    let config = Config {
        league: LeagueConfig {
            name: file.league.name,
            starting_faab: file.league.starting_faab,
            historical_seasons: file.league.historical_seasons,
            league_ids,
            rules: file.league.rules,
        },
        sleeper: file.sleeper,
        storage: file.storage,
    };

    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(invalid("league.name", "must not be empty"));
    }
    if config.league.starting_faab <= 0 {
        return Err(invalid(
            "league.starting_faab",
            format!("must be > 0, got {}", config.league.starting_faab),
        ));
    }
    if config.all_seasons().is_empty() {
        return Err(invalid(
            "league.historical_seasons",
            "at least one historical season or league id is required",
        ));
    }
    if config.sleeper.base_url.trim().is_empty() {
        return Err(invalid("sleeper.base_url", "must not be empty"));
    }
    if config.sleeper.cache_ttl_secs == 0 {
        return Err(invalid("sleeper.cache_ttl_secs", "must be > 0"));
    }
    if config.sleeper.timeout_secs == 0 {
        return Err(invalid("sleeper.timeout_secs", "must be > 0"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
