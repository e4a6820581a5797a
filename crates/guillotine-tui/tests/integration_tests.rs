// End-to-end checks: config on disk, historical season files, standings, and
// CSV export, wired together the way the binary does it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use guillotine_core::color::{HIGH_COLOR, LOW_COLOR, NOT_APPLICABLE_COLOR};
use guillotine_core::model::MAX_WEEK;
use guillotine_core::profile::{average_finishes, build_profile};
use guillotine_core::recap::build_recap;
use guillotine_core::standings::{build_standings, CellState, StandingsContext};
use guillotine_tui::config::{ensure_config_files, load_config_from, Config};
use guillotine_tui::db::Database;
use guillotine_tui::export::export_standings;
use guillotine_tui::repository::{RepositoryError, SeasonRepository, SeasonSource};
use guillotine_tui::selection::SeasonSelection;
use guillotine_tui::sleeper::SleeperClient;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("guillotine_it_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a league.toml serving 2023 and 2024 from the fixtures directory.
fn write_config(base: &Path) -> Config {
    let config_dir = base.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    let toml = format!(
        r#"
[league]
name = "Fixture League"
starting_faab = 1000
historical_seasons = [2023, 2024]

[league.league_ids]
2026 = "L2026"

[sleeper]
base_url = "http://sleeper.invalid/v1"
cache_ttl_secs = 300
timeout_secs = 1

[storage]
data_dir = "{}"
export_dir = "{}"
"#,
        fixtures_dir().display().to_string().replace('\\', "/"),
        base.join("exports").display().to_string().replace('\\', "/"),
    );
    std::fs::write(config_dir.join("league.toml"), toml).unwrap();
    load_config_from(base).unwrap()
}

fn repository(config: &Config) -> SeasonRepository {
    let db = Arc::new(Database::open(":memory:").unwrap());
    let client = SleeperClient::new(&config.sleeper, db);
    SeasonRepository::new(config.clone(), client)
}

#[test]
fn bundled_defaults_load() {
    let base = temp_dir("defaults");
    let defaults = base.join("defaults");
    std::fs::create_dir_all(&defaults).unwrap();
    std::fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("defaults").join("league.toml"),
        defaults.join("league.toml"),
    )
    .unwrap();

    let copied = ensure_config_files(&base).unwrap();
    assert_eq!(copied, vec![base.join("config").join("league.toml")]);
    let config = load_config_from(&base).unwrap();
    assert_eq!(config.league.starting_faab, 1000);
    assert!(!config.all_seasons().is_empty());

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn historical_season_to_standings() {
    let base = temp_dir("standings");
    let config = write_config(&base);
    let repo = repository(&config);

    let list = repo.list_seasons().await;
    assert_eq!(list.seasons, vec![2023, 2024, 2026]);
    assert_eq!(list.current, Some(2026));

    let data = repo.load_season(2024, None).await.unwrap();
    let table = build_standings(
        &data,
        &StandingsContext {
            reigning_champion: Some("Abe".into()),
        },
    );

    assert_eq!(table.visible_weeks, 2);
    assert_eq!(table.remaining, 2);
    let names: Vec<&str> = table.rows.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(names, vec!["Dana", "Cole", "Bree", "Abe"]);

    let dana = table.row("Dana").unwrap();
    assert_eq!(dana.cells[0].background, LOW_COLOR);
    assert_eq!(dana.cells[0].state, CellState::Chopped);
    assert_eq!(dana.cells[1].state, CellState::Eliminated);
    assert_eq!(dana.cells[1].background, NOT_APPLICABLE_COLOR);
    assert_eq!(dana.avg_pos_above_chop, Some(0.0));

    let abe = table.row("Abe").unwrap();
    assert_eq!(abe.cells[0].background, HIGH_COLOR);
    assert_eq!(abe.cells[0].rank, Some(1));
    assert!(abe.is_reigning_champion);

    let cole = table.row("Cole").unwrap();
    assert_eq!(cole.cells[1].rank, Some(3));
    assert_eq!(cole.cells[1].background, LOW_COLOR);

    assert_eq!(table.survivor_summary.faab_remaining.avg, Some(775.0));
    assert_eq!(table.survivor_summary.avg_pos_above_chop.max, Some(2.5));

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn archived_season_without_week_or_finish_is_complete() {
    let base = temp_dir("archived");
    let config = write_config(&base);
    let repo = repository(&config);

    let data = repo.load_season(2023, None).await.unwrap();
    assert_eq!(data.current_week, MAX_WEEK);
    let table = build_standings(&data, &StandingsContext::default());
    assert_eq!(table.visible_weeks, MAX_WEEK);
    assert_eq!(table.remaining, 1);
    assert_eq!(table.champion.as_deref(), Some("Ivy"));
    let finishes: Vec<(&str, Option<u32>)> = table
        .rows
        .iter()
        .map(|r| (r.user_name.as_str(), r.finish_position))
        .collect();
    assert_eq!(finishes, vec![("Gus", Some(3)), ("Hal", Some(2)), ("Ivy", Some(1))]);

    let recap = build_recap(&data);
    assert!(recap.is_complete);
    assert_eq!(recap.champion.as_deref(), Some("Ivy"));
    let order: Vec<&str> = recap.elimination_order.iter().map(|e| e.manager.as_str()).collect();
    assert_eq!(order, vec!["Gus", "Hal"]);
    assert_eq!(recap.biggest_blowouts.len(), 1);
    assert_eq!(recap.biggest_blowouts[0].week, 2);
    assert_eq!(recap.biggest_blowouts[0].margin_to_safety, 39.0);

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn careers_span_archived_seasons() {
    let base = temp_dir("careers");
    let config = write_config(&base);
    let repo = repository(&config);
    let seasons = vec![
        repo.load_season(2023, None).await.unwrap(),
        repo.load_season(2024, None).await.unwrap(),
    ];

    let ivy = build_profile("ivy", &seasons).unwrap();
    assert_eq!(ivy.career.seasons_played, 1);
    assert_eq!(ivy.career.championships, 1);
    assert_eq!(ivy.career.total_weeks_played, MAX_WEEK);

    let table = average_finishes(&seasons);
    assert_eq!(table[0].finishes[&2023], Some(1));
    // Stored places count even while 2024 is mid-season.
    let bree = table.iter().find(|a| a.user_name == "Bree").unwrap();
    assert_eq!(bree.finishes[&2024], Some(1));
    assert!(table.iter().any(|a| a.user_name == "Gus" && a.average_finish == Some(3.0)));

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn archived_seasons_have_no_activity() {
    let base = temp_dir("activity");
    let config = write_config(&base);
    let repo = repository(&config);
    assert_eq!(repo.load_activity(2023).await.unwrap(), None);
    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn week_override_limits_visible_weeks() {
    let base = temp_dir("override");
    let config = write_config(&base);
    let repo = repository(&config);

    let data = repo.load_season(2024, Some(1)).await.unwrap();
    let table = build_standings(&data, &StandingsContext::default());
    assert_eq!(table.visible_weeks, 1);
    assert_eq!(table.remaining, 3);
    assert!(table.rows.iter().all(|r| r.cells.len() == 1));

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn unconfigured_season_is_rejected() {
    let base = temp_dir("unconfigured");
    let config = write_config(&base);
    let repo = repository(&config);
    assert!(matches!(
        repo.load_season(2019, None).await,
        Err(RepositoryError::SeasonNotAvailable(2019))
    ));
    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn export_matches_table() {
    let base = temp_dir("export");
    let config = write_config(&base);
    let repo = repository(&config);
    let data = repo.load_season(2024, None).await.unwrap();
    let table = build_standings(&data, &StandingsContext::default());

    let path = export_standings(&table, Path::new(&config.storage.export_dir)).unwrap();
    assert_eq!(path.file_name().unwrap(), "standings_2024_w2.csv");

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Manager", "Draft", "FAAB", "Wk1", "Wk2"]);
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&records[0][0], "Dana");
    assert_eq!(&records[0][4], "");
    assert_eq!(&records[3][0], "Abe");
    assert_eq!(&records[3][3], "120.00");
    assert_eq!(&records[4][0], "High Score");
    assert_eq!(&records[6][3], "97.50");

    let _ = std::fs::remove_dir_all(&base);
}

#[test]
fn selection_survives_restart() {
    let base = temp_dir("selection");
    let db_path = base.join("state.db");
    {
        let db = Arc::new(Database::open(&db_path.to_string_lossy()).unwrap());
        let selection = SeasonSelection::restore(db, vec![2024, 2026], 2026);
        selection.select(2024).unwrap();
    }
    let db = Arc::new(Database::open(&db_path.to_string_lossy()).unwrap());
    let selection = SeasonSelection::restore(db, vec![2024, 2026], 2026);
    assert_eq!(selection.current(), 2024);
    let _ = std::fs::remove_dir_all(&base);
}
