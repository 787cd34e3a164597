// Configuration Module
//
// Client settings: API credential, endpoints, image sizes, relay toggle and
// the debounce/throttle timings. Stored as JSON in the user config dir.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "cinescope";
const CONFIG_FILE_NAME: &str = "config.json";

const POSTER_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750/1e293b/94a3b8?text=No+Image";
const BACKDROP_PLACEHOLDER: &str =
    "https://via.placeholder.com/1280x720/1e293b/94a3b8?text=No+Image";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Distance from the document bottom that triggers the next page
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold_px: f64,
    // Relay
    #[serde(default)]
    pub use_cors_proxy: bool,
    #[serde(default = "default_cors_proxy")]
    pub cors_proxy: String,
}

fn default_base_url() -> String { "https://api.themoviedb.org/3".to_string() }
fn default_image_base_url() -> String { "https://image.tmdb.org/t/p".to_string() }
fn default_poster_size() -> String { "w500".to_string() }
fn default_backdrop_size() -> String { "w1280".to_string() }
fn default_debounce_ms() -> u64 { 300 }
fn default_throttle_ms() -> u64 { 200 }
fn default_scroll_threshold() -> f64 { 300.0 }
fn default_cors_proxy() -> String { "https://api.allorigins.win/raw?url=".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            backdrop_size: default_backdrop_size(),
            debounce_ms: default_debounce_ms(),
            throttle_ms: default_throttle_ms(),
            scroll_threshold_px: default_scroll_threshold(),
            use_cors_proxy: false,
            cors_proxy: default_cors_proxy(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Load from the user config dir, then apply environment overrides.
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable config {:?}: {:#}", path, e);
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// `TMDB_API_KEY` replaces the stored key; `CINESCOPE_USE_PROXY`
    /// (`1`/`true`/`0`/`false`) toggles the relay.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("TMDB_API_KEY").ok(),
            std::env::var("CINESCOPE_USE_PROXY").ok(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<String>, use_proxy: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        match use_proxy.as_deref().map(str::trim) {
            Some("1") | Some("true") => self.use_cors_proxy = true,
            Some("0") | Some("false") => self.use_cors_proxy = false,
            _ => {}
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn poster_url(&self, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}{}", self.image_base_url, self.poster_size, p),
            None => POSTER_PLACEHOLDER.to_string(),
        }
    }

    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}{}", self.image_base_url, self.backdrop_size, p),
            None => BACKDROP_PLACEHOLDER.to_string(),
        }
    }
}
