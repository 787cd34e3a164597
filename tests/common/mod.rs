#![allow(dead_code)]

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use cinescope_lib::browse::{Discovery, Metrics, MetricsSnapshot};
use cinescope_lib::config::AppConfig;
use cinescope_lib::database::watchlist::{WatchlistEntry, WatchlistStore};
use cinescope_lib::database::Database;
use cinescope_lib::media::{Genre, MediaDetails};
use cinescope_lib::renderer::{LoadingIndicator, Notice, RenderedCard, Renderer, ResultsInfo};
use cinescope_lib::tmdb::{HttpResponse, HttpTransport, TmdbClient};

struct Route {
    patterns: Vec<String>,
    response: Result<HttpResponse, String>,
}

/// In-process stand-in for the TMDB API. Routes match when every pattern
/// is a substring of the requested URL; the most recently added route wins.
#[derive(Default)]
pub struct FakeTmdb {
    urls: Mutex<Vec<String>>,
    routes: Mutex<Vec<Route>>,
    held: Mutex<Option<String>>,
    released: Condvar,
}

impl FakeTmdb {
    pub fn route(&self, patterns: &[&str], status: u16, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(
            0,
            Route {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                response: Ok(HttpResponse {
                    status,
                    status_text: if status < 400 { "OK" } else { "Error" }.to_string(),
                    body: body.into(),
                }),
            },
        );
    }

    pub fn fail(&self, patterns: &[&str], message: &str) {
        self.routes.lock().unwrap().insert(
            0,
            Route {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                response: Err(message.to_string()),
            },
        );
    }

    /// Block requests whose URL contains `pattern` until `release` is called
    pub fn hold(&self, pattern: &str) {
        *self.held.lock().unwrap() = Some(pattern.to_string());
    }

    pub fn release(&self) {
        *self.held.lock().unwrap() = None;
        self.released.notify_all();
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn urls_matching(&self, pattern: &str) -> Vec<String> {
        self.urls().into_iter().filter(|u| u.contains(pattern)).collect()
    }
}

impl HttpTransport for FakeTmdb {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        self.urls.lock().unwrap().push(url.to_string());

        let mut held = self.held.lock().unwrap();
        while held.as_deref().map_or(false, |p| url.contains(p)) {
            held = self.released.wait(held).unwrap();
        }
        drop(held);

        let routes = self.routes.lock().unwrap();
        routes
            .iter()
            .find(|r| r.patterns.iter().all(|p| url.contains(p.as_str())))
            .map(|r| r.response.clone())
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    status_text: "Not Found".to_string(),
                    body: r#"{"status_message":"no route"}"#.to_string(),
                })
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Results { ids: Vec<u64>, in_watchlist: Vec<bool>, append: bool },
    Info(ResultsInfo),
    Notice(Notice),
    Loading(LoadingIndicator),
    LoadingFinished(LoadingIndicator),
    NoResults(bool),
    EndOfResults,
    Genres(Vec<Genre>),
    Details { id: u64, in_watchlist: bool },
    Watchlist(usize),
    BackToTop(bool),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Event>>,
    last_metrics: Mutex<Option<MetricsSnapshot>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<(Vec<u64>, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Results { ids, append, .. } => Some((ids, append)),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn last_info(&self) -> Option<ResultsInfo> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Info(info) => Some(info),
            _ => None,
        })
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    pub fn last_metrics(&self) -> Option<MetricsSnapshot> {
        *self.last_metrics.lock().unwrap()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn render_results(&self, cards: &[RenderedCard], append: bool) {
        self.push(Event::Results {
            ids: cards.iter().map(|c| c.card.id).collect(),
            in_watchlist: cards.iter().map(|c| c.in_watchlist).collect(),
            append,
        });
    }

    fn results_info(&self, info: &ResultsInfo) {
        self.push(Event::Info(info.clone()));
    }

    fn notify(&self, notice: Notice) {
        self.push(Event::Notice(notice));
    }

    fn loading(&self, indicator: LoadingIndicator) {
        self.push(Event::Loading(indicator));
    }

    fn loading_finished(&self, indicator: LoadingIndicator) {
        self.push(Event::LoadingFinished(indicator));
    }

    fn no_results(&self, visible: bool) {
        self.push(Event::NoResults(visible));
    }

    fn end_of_results(&self) {
        self.push(Event::EndOfResults);
    }

    fn genres(&self, genres: &[Genre]) {
        self.push(Event::Genres(genres.to_vec()));
    }

    fn details(&self, details: &MediaDetails, in_watchlist: bool) {
        self.push(Event::Details { id: details.card.id, in_watchlist });
    }

    fn watchlist_changed(&self, entries: &[WatchlistEntry]) {
        self.push(Event::Watchlist(entries.len()));
    }

    fn metrics_changed(&self, snapshot: &MetricsSnapshot) {
        *self.last_metrics.lock().unwrap() = Some(*snapshot);
    }

    fn back_to_top(&self, visible: bool) {
        self.push(Event::BackToTop(visible));
    }
}

pub struct Harness {
    pub discovery: Arc<Discovery>,
    pub transport: Arc<FakeTmdb>,
    pub renderer: Arc<RecordingRenderer>,
    pub database: Database,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.api_key = "test-key".to_string();
    config.debounce_ms = 100;
    config
}

pub async fn harness() -> Harness {
    harness_with(test_config()).await
}

pub async fn harness_with(config: AppConfig) -> Harness {
    let database = Database::in_memory().await.unwrap();
    let watchlist = WatchlistStore::load(database.pool().clone()).await.unwrap();
    let transport = Arc::new(FakeTmdb::default());
    let renderer = Arc::new(RecordingRenderer::default());

    transport.route(&["/genre/movie/list"], 200, r#"{"genres":[{"id":28,"name":"Action"}]}"#);
    transport.route(&["/genre/tv/list"], 200, r#"{"genres":[{"id":18,"name":"Drama"}]}"#);

    let client = TmdbClient::with_transport(&config, transport.clone(), Arc::new(Metrics::new()));
    let discovery = Discovery::new(&config, Arc::new(client), Arc::new(watchlist), renderer.clone());

    Harness { discovery, transport, renderer, database }
}

/// Listing body with one result per id
pub fn page_json(page: u32, total_pages: u32, total_results: u64, ids: &[u64]) -> String {
    let results: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id":{id},"title":"Movie {id}","name":"Show {id}","poster_path":"/{id}.jpg","vote_average":7.1,"release_date":"2001-01-01","overview":"..."}}"#
            )
        })
        .collect();
    format!(
        r#"{{"page":{page},"results":[{}],"total_pages":{total_pages},"total_results":{total_results}}}"#,
        results.join(",")
    )
}

/// Poll until `condition` holds or five seconds pass
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
