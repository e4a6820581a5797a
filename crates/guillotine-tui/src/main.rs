// Guillotine league dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database
// 4. Build the Sleeper client and season repository
// 5. Restore the selected season
// 6. Spawn the app task, run the TUI
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use guillotine_tui::app;
use guillotine_tui::config;
use guillotine_tui::db;
use guillotine_tui::repository::{SeasonRepository, SeasonSource};
use guillotine_tui::selection::SeasonSelection;
use guillotine_tui::sleeper::SleeperClient;
use guillotine_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Guillotine dashboard starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, seasons={:?}",
        config.league.name,
        config.all_seasons()
    );

    let db_path = config.db_path();
    let db = Arc::new(
        db::Database::open(&db_path.to_string_lossy()).context("failed to open database")?,
    );
    info!("Database opened at {}", db_path.display());

    let client = SleeperClient::new(&config.sleeper, db.clone());
    let source: Arc<dyn SeasonSource> = Arc::new(SeasonRepository::new(config.clone(), client));

    let list = source.list_seasons().await;
    let current = list
        .current
        .context("no seasons configured")?;
    let selection = SeasonSelection::restore(db, list.seasons, current);
    info!("Selected season {}", selection.current());

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, source, selection);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Guillotine dashboard shut down cleanly");
    Ok(())
}

/// Log to a file; the terminal belongs to the TUI.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("guillotine.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("guillotine_tui=info,guillotine_core=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
