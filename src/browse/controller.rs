// Discovery Controller
//
// Turns UI events into fetches: debounced search/filter input, immediate
// sort/type/clear actions, throttled infinite scroll. Network work runs on
// the blocking pool through the TMDB client; every failure is reported to
// the renderer and swallowed so one bad request never wedges the session.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Datelike;
use tokio::runtime::Handle;

use super::metrics::{Metrics, MetricsSnapshot};
use super::scheduler::{Debouncer, Throttler};
use super::state::{Completion, FetchPlan, QueryAction, QueryState};
use crate::config::AppConfig;
use crate::database::watchlist::{WatchlistStore, WatchlistToggle};
use crate::media::{ContentType, Genre, MediaCard, MediaDetails, ResultPage, SortKey};
use crate::renderer::{
    group_thousands, LoadingIndicator, Notice, RenderedCard, Renderer, ResultsInfo,
};
use crate::tmdb::{ApiError, ListingRequest, TmdbClient};

const BACK_TO_TOP_OFFSET: f64 = 500.0;
const OLDEST_YEAR: i32 = 1900;
const WELCOME_MESSAGE: &str = "Welcome to CineScope! Try searching for your favorite movies.";

/// Viewport sample taken on scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold
    }
}

/// What became of a requested fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was rendered with this many cards
    Rendered { count: usize },
    /// Another fetch was in flight; this one runs when it settles
    Deferred,
    /// Nothing to fetch (throttled, not near the bottom, last page reached)
    Skipped,
    /// Response arrived for an outdated query and was dropped
    Stale,
    Failed,
}

pub struct Discovery {
    client: Arc<TmdbClient>,
    watchlist: Arc<WatchlistStore>,
    renderer: Arc<dyn Renderer>,
    metrics: Arc<Metrics>,
    state: Mutex<QueryState>,
    search_debouncer: Debouncer,
    scroll_throttler: Throttler,
    scroll_threshold: f64,
}

impl Discovery {
    /// Build the controller on the current Tokio runtime. The runtime handle
    /// is kept for debounced work, so the synchronous input handlers
    /// (`on_search_input`, `select_genre`, `select_year`) can be called from
    /// any thread afterwards.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(
        config: &AppConfig,
        client: Arc<TmdbClient>,
        watchlist: Arc<WatchlistStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Arc<Self> {
        let metrics = Arc::clone(client.metrics());
        Arc::new(Self {
            client,
            watchlist,
            renderer,
            metrics,
            state: Mutex::new(QueryState::default()),
            search_debouncer: Debouncer::new(config.debounce_delay(), Handle::current()),
            scroll_throttler: Throttler::new(config.throttle_interval()),
            scroll_threshold: config.scroll_threshold_px,
        })
    }

    // --- State access ---

    fn with_state<T>(&self, f: impl FnOnce(&mut QueryState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Snapshot of the current query state
    pub fn state(&self) -> QueryState {
        self.with_state(|s| s.clone())
    }

    fn dispatch(&self, action: QueryAction) {
        log::debug!("Query action: {:?}", action);
        self.with_state(|s| *s = s.clone().reduce(action));
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn publish_metrics(&self) {
        self.renderer.metrics_changed(&self.metrics.snapshot());
    }

    pub fn watchlist(&self) -> &Arc<WatchlistStore> {
        &self.watchlist
    }

    // --- Startup ---

    /// Populate filters and show this week's trending titles.
    pub async fn initialize(&self) -> FetchOutcome {
        log::info!("Initializing discovery ({} watchlist entries)", self.watchlist.len());
        self.renderer.watchlist_changed(&self.watchlist.entries());
        self.publish_metrics();
        self.load_genres().await;

        let outcome = match self.with_state(|s| s.begin_trending()) {
            Some(plan) => self.run(plan).await,
            None => FetchOutcome::Deferred,
        };
        self.renderer.notify(Notice::info(WELCOME_MESSAGE));
        outcome
    }

    /// Year filter choices, newest first
    pub fn year_options() -> Vec<i32> {
        let current = chrono::Local::now().year();
        (OLDEST_YEAR..=current).rev().collect()
    }

    pub async fn load_genres(&self) -> Option<Vec<Genre>> {
        let content_type = self.state().content_type;
        let genres = self.call(move |client| client.genres(content_type)).await?;
        self.renderer.genres(&genres);
        Some(genres)
    }

    pub async fn check_connectivity(&self) -> bool {
        let client = Arc::clone(&self.client);
        let reachable = tokio::task::spawn_blocking(move || client.check_connectivity())
            .await
            .unwrap_or(false);
        self.publish_metrics();
        reachable
    }

    // --- Search and filters ---

    /// Keystroke in the search box. Only the last keystroke inside the
    /// debounce window reaches the network.
    pub fn on_search_input(self: &Arc<Self>, text: impl Into<String>) {
        let text = text.into();
        self.metrics.record_search_event();
        if !text.is_empty() {
            self.metrics.record_saved();
        }
        self.publish_metrics();
        self.dispatch(QueryAction::SetSearchText(text));
        self.schedule_refresh();
    }

    pub fn select_genre(self: &Arc<Self>, genre: Option<u32>) {
        self.dispatch(QueryAction::SetGenre(genre));
        self.metrics.record_saved();
        self.publish_metrics();
        self.schedule_refresh();
    }

    pub fn select_year(self: &Arc<Self>, year: Option<i32>) {
        self.dispatch(QueryAction::SetYear(year));
        self.metrics.record_saved();
        self.publish_metrics();
        self.schedule_refresh();
    }

    pub async fn select_sort(&self, sort: SortKey) -> FetchOutcome {
        self.dispatch(QueryAction::SetSort(sort));
        self.refresh().await
    }

    pub async fn clear_search(&self) -> FetchOutcome {
        self.search_debouncer.cancel();
        self.dispatch(QueryAction::SetSearchText(String::new()));
        self.refresh().await
    }

    /// Switch between movies and series: page resets to 1, genres reload,
    /// and a discovery fetch for the new type replaces the grid.
    pub async fn switch_content_type(&self, content_type: ContentType) -> FetchOutcome {
        self.search_debouncer.cancel();
        self.dispatch(QueryAction::SetContentType(content_type));
        self.load_genres().await;
        self.refresh().await
    }

    fn schedule_refresh(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.search_debouncer.schedule(async move {
            this.refresh().await;
        });
    }

    /// Fetch page 1 of the current query and replace the grid.
    pub async fn refresh(&self) -> FetchOutcome {
        match self.with_state(|s| s.begin_refresh()) {
            Some(plan) => self.run(plan).await,
            None => {
                log::debug!("Fetch in flight; refresh deferred");
                FetchOutcome::Deferred
            }
        }
    }

    // --- Pagination ---

    /// Throttled scroll sample. Near the bottom it loads the next page.
    pub async fn on_scroll(&self, position: ScrollPosition) -> FetchOutcome {
        if !self.scroll_throttler.try_acquire() {
            return FetchOutcome::Skipped;
        }
        self.metrics.record_scroll_event();
        self.publish_metrics();
        self.renderer.back_to_top(position.scroll_top > BACK_TO_TOP_OFFSET);

        if position.near_bottom(self.scroll_threshold) {
            self.load_more().await
        } else {
            FetchOutcome::Skipped
        }
    }

    /// Append the next page of the current query, if any.
    pub async fn load_more(&self) -> FetchOutcome {
        match self.with_state(|s| s.begin_next_page()) {
            Some(plan) => self.run(plan).await,
            None => FetchOutcome::Skipped,
        }
    }

    // --- Watchlist and details ---

    pub async fn toggle_watchlist(&self, card: &MediaCard) -> Option<WatchlistToggle> {
        match self.watchlist.toggle(card).await {
            Ok(outcome) => {
                let notice = match outcome {
                    WatchlistToggle::Added => Notice::success(outcome.message()),
                    WatchlistToggle::Removed => Notice::info(outcome.message()),
                };
                self.renderer.notify(notice);
                self.renderer.watchlist_changed(&self.watchlist.entries());
                Some(outcome)
            }
            Err(e) => {
                log::error!("Failed to update watchlist: {:#}", e);
                self.renderer.notify(Notice::error("Failed to update watchlist"));
                None
            }
        }
    }

    /// Saved entries as cards, for the watchlist view
    pub fn watchlist_cards(&self) -> Vec<RenderedCard> {
        self.watchlist
            .entries()
            .iter()
            .map(|entry| RenderedCard { card: MediaCard::from(entry), in_watchlist: true })
            .collect()
    }

    pub async fn show_details(&self, id: u64) -> Option<MediaDetails> {
        let content_type = self.state().content_type;
        let details = self.call(move |client| client.details(content_type, id)).await?;
        self.renderer.details(&details, self.watchlist.contains(details.card.id));
        Some(details)
    }

    // --- Fetch execution ---

    /// Run a blocking client call, converting any failure into a notice.
    async fn call<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&TmdbClient) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let result = tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| ApiError::Task(e.to_string()))
            .and_then(|r| r);
        self.publish_metrics();

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("API error: {}", e);
                self.renderer.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    /// Execute a plan, then any refresh that was requested meanwhile.
    async fn run(&self, plan: FetchPlan) -> FetchOutcome {
        let mut outcome = self.execute(plan).await;
        while let Some(next) = self.with_state(|s| {
            if s.take_pending_refresh() {
                s.begin_refresh()
            } else {
                None
            }
        }) {
            outcome = self.execute(next).await;
        }
        outcome
    }

    async fn execute(&self, plan: FetchPlan) -> FetchOutcome {
        let indicator = if plan.append {
            LoadingIndicator::LoadMore
        } else {
            LoadingIndicator::Skeleton
        };
        self.renderer.loading(indicator);

        let request = plan.request.clone();
        let content_type = plan.content_type;
        let page = plan.page;
        let result = self
            .call(move |client| client.listing(content_type, &request, page))
            .await;

        let completion = self.with_state(|s| s.complete(&plan, result.as_ref().map(|p| p.total_pages)));
        self.renderer.loading_finished(indicator);

        match (completion, result) {
            (Completion::Applied, Some(page)) => self.render_page(&plan, page),
            (Completion::Stale, _) => {
                log::warn!(
                    "Discarding stale response for {} page {} (seq {})",
                    plan.content_type,
                    plan.page,
                    plan.seq
                );
                FetchOutcome::Stale
            }
            _ => FetchOutcome::Failed,
        }
    }

    fn render_page(&self, plan: &FetchPlan, page: ResultPage) -> FetchOutcome {
        let cards: Vec<RenderedCard> = page
            .results
            .into_iter()
            .map(|card| RenderedCard { in_watchlist: self.watchlist.contains(card.id), card })
            .collect();

        self.renderer.render_results(&cards, plan.append);
        if !plan.append {
            self.renderer.no_results(cards.is_empty());
        }

        let state = self.state();
        let title = match plan.request {
            ListingRequest::Trending => format!("Trending {}", plan.content_type.label()),
            _ => state.results_title(),
        };
        let stats = (!state.search_text.is_empty())
            .then(|| format!("Found {} results", group_thousands(page.total_results)));
        self.renderer.results_info(&ResultsInfo {
            title,
            page: state.current_page,
            total_pages: state.total_pages,
            stats,
        });

        if plan.append && state.is_last_page() {
            self.renderer.end_of_results();
        }

        log::debug!(
            "Rendered {} cards for {} page {} of {}",
            cards.len(),
            plan.content_type,
            state.current_page,
            state.total_pages
        );
        FetchOutcome::Rendered { count: cards.len() }
    }
}
