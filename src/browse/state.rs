// Query State
//
// Everything that decides what the next listing fetch asks for, plus the
// bookkeeping that keeps fetches from overlapping or landing out of order.
// User actions go through `reduce`; fetch lifecycle goes through
// `begin_*` / `complete`.

use serde::{Deserialize, Serialize};

use crate::media::{ContentType, SortKey};
use crate::tmdb::{DiscoverFilters, ListingRequest};

/// User-driven changes to the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryAction {
    SetContentType(ContentType),
    SetSearchText(String),
    SetGenre(Option<u32>),
    SetYear(Option<i32>),
    SetSort(SortKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub content_type: ContentType,
    pub search_text: String,
    pub genre: Option<u32>,
    pub year: Option<i32>,
    pub sort: SortKey,
    pub current_page: u32,
    pub total_pages: u32,
    pub in_flight: bool,
    /// Tag of the only fetch whose response may still be applied
    seq: u64,
    /// A refresh was requested while another fetch was in flight
    pending_refresh: bool,
    /// The query changed and the grid has not been refreshed for it yet
    awaiting_refresh: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            content_type: ContentType::Movie,
            search_text: String::new(),
            genre: None,
            year: None,
            sort: SortKey::PopularityDesc,
            current_page: 1,
            total_pages: 1,
            in_flight: false,
            seq: 0,
            pending_refresh: false,
            awaiting_refresh: false,
        }
    }
}

/// One fetch the controller should execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub seq: u64,
    pub content_type: ContentType,
    pub request: ListingRequest,
    pub page: u32,
    /// Extend the grid instead of replacing it
    pub append: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Response belongs to the current query; render it
    Applied,
    /// Superseded by a later action or fetch; drop it
    Stale,
    /// The fetch failed; prior results stay on screen
    Failed,
}

impl QueryState {
    pub fn reduce(self, action: QueryAction) -> Self {
        let mut next = Self {
            // Anything still in flight now answers an outdated query
            seq: self.seq + 1,
            awaiting_refresh: true,
            ..self
        };
        match action {
            QueryAction::SetContentType(content_type) => {
                next.content_type = content_type;
                next.current_page = 1;
                next.total_pages = 1;
            }
            QueryAction::SetSearchText(text) => next.search_text = text,
            QueryAction::SetGenre(genre) => next.genre = genre,
            QueryAction::SetYear(year) => next.year = year,
            QueryAction::SetSort(sort) => next.sort = sort,
        }
        next
    }

    pub fn filters(&self) -> DiscoverFilters {
        DiscoverFilters { genre: self.genre, year: self.year, sort: self.sort }
    }

    pub fn has_search_text(&self) -> bool {
        !self.search_text.trim().is_empty()
    }

    /// Text search when there is search text, discovery otherwise
    pub fn listing_request(&self) -> ListingRequest {
        if self.has_search_text() {
            ListingRequest::Search { query: self.search_text.clone() }
        } else {
            ListingRequest::Discover(self.filters())
        }
    }

    /// Heading shown above the grid
    pub fn results_title(&self) -> String {
        if self.has_search_text() {
            format!("Search results for \"{}\"", self.search_text)
        } else {
            format!("Trending {}", self.content_type.label())
        }
    }

    /// Start a page-1 fetch of the current query. While another fetch is
    /// in flight the refresh is recorded as pending instead.
    pub fn begin_refresh(&mut self) -> Option<FetchPlan> {
        let request = self.listing_request();
        self.begin_first_page(request)
    }

    /// Start a page-1 fetch of this week's trending titles (startup view).
    pub fn begin_trending(&mut self) -> Option<FetchPlan> {
        self.begin_first_page(ListingRequest::Trending)
    }

    fn begin_first_page(&mut self, request: ListingRequest) -> Option<FetchPlan> {
        if self.in_flight {
            self.pending_refresh = true;
            return None;
        }
        self.seq += 1;
        self.in_flight = true;
        Some(self.plan(request, 1, false))
    }

    /// Start a fetch of the page after `current_page`, if there is one and
    /// nothing else is in flight.
    pub fn begin_next_page(&mut self) -> Option<FetchPlan> {
        if self.in_flight || self.awaiting_refresh || self.current_page >= self.total_pages {
            return None;
        }
        self.seq += 1;
        self.in_flight = true;
        let request = self.listing_request();
        Some(self.plan(request, self.current_page + 1, true))
    }

    fn plan(&self, request: ListingRequest, page: u32, append: bool) -> FetchPlan {
        FetchPlan {
            seq: self.seq,
            content_type: self.content_type,
            request,
            page,
            append,
        }
    }

    /// Settle a fetch. `total_pages` is `None` when the fetch failed.
    /// Paging only moves when a response is applied, so a failure leaves
    /// the state describing the grid that is still on screen.
    pub fn complete(&mut self, plan: &FetchPlan, total_pages: Option<u32>) -> Completion {
        self.in_flight = false;

        if plan.seq != self.seq {
            return Completion::Stale;
        }

        match total_pages {
            Some(total) => {
                self.current_page = plan.page;
                if !plan.append {
                    self.total_pages = total.max(1);
                    self.awaiting_refresh = false;
                }
                Completion::Applied
            }
            None => Completion::Failed,
        }
    }

    pub fn take_pending_refresh(&mut self) -> bool {
        std::mem::take(&mut self.pending_refresh)
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }
}
