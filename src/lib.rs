// Module declarations
pub mod browse;
pub mod config;
pub mod database;
pub mod media;
pub mod renderer;
pub mod tmdb;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use browse::{Discovery, Metrics};
use config::AppConfig;
use database::watchlist::WatchlistStore;
use database::Database;
use renderer::Renderer;
use tmdb::TmdbClient;

const DATABASE_FILE: &str = "cinescope.db";

/// Default location of the local database
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("cinescope");
    path
}

/// Wire the client for a session: open the database under `data_dir`, load
/// the watchlist, and build the discovery controller around `renderer`.
/// Call `initialize()` on the result to show the first page.
pub async fn start(
    config: &AppConfig,
    data_dir: &Path,
    renderer: Arc<dyn Renderer>,
) -> Result<Arc<Discovery>> {
    let db_path = data_dir.join(DATABASE_FILE);
    log::info!("Initializing database at: {:?}", db_path);

    let database = Database::new(&db_path)
        .await
        .context("Failed to initialize database")?;
    let watchlist = WatchlistStore::load(database.pool().clone())
        .await
        .context("Failed to load watchlist")?;

    if config.api_key.is_empty() {
        log::warn!("No TMDB API key configured; requests will be rejected");
    }

    let client = TmdbClient::new(config, Arc::new(Metrics::new()));
    let discovery = Discovery::new(config, Arc::new(client), Arc::new(watchlist), renderer);

    log::info!("Discovery client ready (proxy: {})", config.use_cors_proxy);
    Ok(discovery)
}
