// Cybermetrics terminal client entry point.
//
// Startup sequence:
// 1. Load config
// 2. Initialize tracing (log to file, not terminal)
// 3. Open the session database and restore any stored session
// 4. Build the HTTP client
// 5. Create mpsc channels
// 6. Spawn the app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use directories::ProjectDirs;
use tokio::sync::mpsc;
use tracing::{error, info};

use cybermetrics_core::api::{ApiClient, CybermetricsApi};
use cybermetrics_core::config::{self, Config};
use cybermetrics_core::db::Database;
use cybermetrics_core::gate::Route;
use cybermetrics_core::session::SessionContext;
use cybermetrics_tui::{app, tui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config (before tracing: the log filter lives in it)
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config)?;
    info!("Cybermetrics client starting up, API at {}", config.api.base_url);

    // 3. Open database and hydrate the session
    let db_path = resolve_db_path(&config.database.path)?;
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    let session = SessionContext::hydrate(Arc::new(db)).context("failed to restore session")?;
    if session.is_authenticated() {
        info!("Stored session found");
    }

    // 4. HTTP client
    let api: Arc<dyn CybermetricsApi> = Arc::new(
        ApiClient::new(&config.api, session.clone()).context("failed to build HTTP client")?,
    );

    // 5. Channels
    let (net_tx, net_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, api, session, net_tx);

    // 6. App logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, net_rx, ui_tx, app_state, Route::Landing).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. TUI (returns when the user presses 'q' or Ctrl+C)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: give the app task a moment to wind down
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Cybermetrics client shut down cleanly");
    Ok(())
}

/// Relative database paths live in the platform data directory; absolute
/// paths and `:memory:` are used as given.
fn resolve_db_path(configured: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(configured);
    if configured == ":memory:" || path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let Some(dirs) = ProjectDirs::from("com", "cybermetrics", "cybermetrics") else {
        return Ok(path.to_path_buf());
    };
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    Ok(data_dir.join(path))
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&config.logging.directory);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("cybermetrics.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
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
