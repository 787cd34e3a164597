// Watchlist Module
//
// The user's saved titles. Held in memory, mirrored to a single settings
// slot as a JSON array, fully rewritten on every mutation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::settings::{get_setting, put_setting};
use crate::media::{ContentType, MediaCard};

pub const WATCHLIST_KEY: &str = "watchlist";

/// Stored summary of a saved title. Field names match the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
}

impl From<&MediaCard> for WatchlistEntry {
    fn from(card: &MediaCard) -> Self {
        Self {
            id: card.id,
            title: card.title.clone(),
            poster_path: card.poster_path.clone(),
            vote_average: card.rating,
            content_type: card.content_type,
        }
    }
}

impl From<&WatchlistEntry> for MediaCard {
    fn from(entry: &WatchlistEntry) -> Self {
        MediaCard {
            id: entry.id,
            content_type: entry.content_type,
            title: entry.title.clone(),
            poster_path: entry.poster_path.clone(),
            backdrop_path: None,
            rating: entry.vote_average,
            release_year: None,
            overview: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistToggle {
    Added,
    Removed,
}

impl WatchlistToggle {
    pub fn message(&self) -> &'static str {
        match self {
            WatchlistToggle::Added => "Added to watchlist",
            WatchlistToggle::Removed => "Removed from watchlist",
        }
    }
}

/// Membership is keyed by id alone: a movie and a series sharing a numeric
/// id are treated as the same entry.
pub struct WatchlistStore {
    pool: SqlitePool,
    entries: Mutex<Vec<WatchlistEntry>>,
    // Serializes persistence so slot writes land in mutation order
    write_gate: tokio::sync::Mutex<()>,
}

impl WatchlistStore {
    /// Read the persisted list once. A malformed slot is logged and treated
    /// as empty; duplicate ids keep their first occurrence.
    pub async fn load(pool: SqlitePool) -> Result<Self> {
        let entries = match get_setting(&pool, WATCHLIST_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
                Ok(entries) => dedupe(entries),
                Err(e) => {
                    log::warn!("Discarding malformed watchlist data: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        log::debug!("Loaded {} watchlist entries", entries.len());

        Ok(Self {
            pool,
            entries: Mutex::new(entries),
            write_gate: tokio::sync::Mutex::new(()),
        })
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<WatchlistEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.lock_entries().iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> Vec<WatchlistEntry> {
        self.lock_entries().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub async fn toggle(&self, card: &MediaCard) -> Result<WatchlistToggle> {
        self.toggle_entry(WatchlistEntry::from(card)).await
    }

    /// Remove the entry with this id if present, otherwise insert it, then
    /// rewrite the persisted list. On a failed write the in-memory list is
    /// restored so both copies stay identical.
    pub async fn toggle_entry(&self, entry: WatchlistEntry) -> Result<WatchlistToggle> {
        let _gate = self.write_gate.lock().await;

        let (outcome, previous, serialized) = {
            let mut entries = self.lock_entries();
            let previous = entries.clone();
            let outcome = match entries.iter().position(|e| e.id == entry.id) {
                Some(index) => {
                    entries.remove(index);
                    WatchlistToggle::Removed
                }
                None => {
                    entries.push(entry.clone());
                    WatchlistToggle::Added
                }
            };
            (outcome, previous, serde_json::to_string(&*entries)?)
        };

        if let Err(e) = put_setting(&self.pool, WATCHLIST_KEY, &serialized).await {
            *self.lock_entries() = previous;
            return Err(e.context("Failed to persist watchlist"));
        }

        log::debug!("Watchlist {:?}: {} ({})", outcome, entry.title, entry.id);
        Ok(outcome)
    }

    /// Contents of the persisted slot
    pub async fn persisted(&self) -> Result<Vec<WatchlistEntry>> {
        let raw = get_setting(&self.pool, WATCHLIST_KEY).await?;
        Ok(match raw {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        })
    }
}

fn dedupe(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut seen = std::collections::HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id)).collect()
}
