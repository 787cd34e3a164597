// Renderer Boundary
//
// The core never builds markup. It pushes normalized records into a
// Renderer implemented by the host (webview bridge, TUI, test recorder).

use serde::{Deserialize, Serialize};

use crate::browse::metrics::MetricsSnapshot;
use crate::database::watchlist::WatchlistEntry;
use crate::media::{Genre, MediaCard, MediaDetails};

/// A result card plus its watchlist flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedCard {
    pub card: MediaCard,
    pub in_watchlist: bool,
}

/// Heading and counters above the result grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsInfo {
    pub title: String,
    pub page: u32,
    pub total_pages: u32,
    /// `Found N results`, only while a search text is active
    pub stats: Option<String>,
}

impl ResultsInfo {
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Toast notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingIndicator {
    /// Full-grid skeleton for a fresh query
    Skeleton,
    /// Footer spinner while the next page loads
    LoadMore,
}

pub trait Renderer: Send + Sync {
    /// Replace (`append == false`) or extend the result grid.
    fn render_results(&self, cards: &[RenderedCard], append: bool);

    fn results_info(&self, info: &ResultsInfo);

    fn notify(&self, notice: Notice);

    fn loading(&self, _indicator: LoadingIndicator) {}

    /// The fetch announced by `loading` settled (applied, failed or stale);
    /// clear the indicator
    fn loading_finished(&self, _indicator: LoadingIndicator) {}

    /// Nothing matched the current query
    fn no_results(&self, _visible: bool) {}

    /// The last page of the current query has been appended
    fn end_of_results(&self) {}

    fn genres(&self, _genres: &[Genre]) {}

    fn details(&self, _details: &MediaDetails, _in_watchlist: bool) {}

    fn watchlist_changed(&self, _entries: &[WatchlistEntry]) {}

    fn metrics_changed(&self, _snapshot: &MetricsSnapshot) {}

    fn back_to_top(&self, _visible: bool) {}
}

/// Thousands-grouped count, e.g. `12,345`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
