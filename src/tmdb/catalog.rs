use super::client::{QueryParams, TmdbClient};
use super::error::ApiError;
use super::types::*;
use crate::media::{
    CastMember, ContentType, Genre, MediaCard, MediaDetails, ResultPage, SortKey, Trailer,
};

const TOP_CAST: usize = 5;
const DETAIL_APPENDS: &str = "credits,videos,similar";

/// Filters applied to a discovery listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverFilters {
    pub genre: Option<u32>,
    pub year: Option<i32>,
    pub sort: SortKey,
}

/// What a listing fetch asks for. Built by the query state, executed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRequest {
    Search { query: String },
    Discover(DiscoverFilters),
    Trending,
}

// --- Mapping helpers ---

/// Year part of a `YYYY-MM-DD` date; empty or malformed dates yield `None`.
pub fn release_year(date: Option<&str>) -> Option<i32> {
    date?.trim().get(..4)?.parse().ok()
}

fn pick_title(title: &Option<String>, name: &Option<String>) -> String {
    title
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| name.as_deref().filter(|n| !n.is_empty()))
        .unwrap_or("Untitled")
        .to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

pub fn to_media_card(item: &TmdbListItem, content_type: ContentType) -> MediaCard {
    MediaCard {
        id: item.id,
        content_type,
        title: pick_title(&item.title, &item.name),
        poster_path: non_empty(&item.poster_path),
        backdrop_path: non_empty(&item.backdrop_path),
        rating: item.vote_average.map(|v| v as f32),
        release_year: release_year(
            item.release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(item.first_air_date.as_deref()),
        ),
        overview: non_empty(&item.overview),
    }
}

pub fn to_result_page(page: TmdbPage<TmdbListItem>, content_type: ContentType) -> ResultPage {
    ResultPage {
        page: page.page,
        results: page
            .results
            .iter()
            .map(|item| to_media_card(item, content_type))
            .collect(),
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

fn find_trailer(videos: &Option<TmdbVideos>) -> Option<Trailer> {
    videos
        .as_ref()?
        .results
        .iter()
        .find(|v| v.video_type.as_deref() == Some("Trailer") && v.site.as_deref() == Some("YouTube"))
        .map(|v| Trailer {
            key: v.key.clone(),
            name: v.name.clone(),
            embed_url: format!("https://www.youtube.com/embed/{}", v.key),
        })
}

pub fn to_media_details(details: TmdbDetails, content_type: ContentType) -> MediaDetails {
    let credits = details.credits.clone().unwrap_or_default();

    let director = credits
        .crew
        .iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.clone());

    let cast = credits
        .cast
        .iter()
        .take(TOP_CAST)
        .map(|c| CastMember {
            name: c.name.clone(),
            character: c.character.clone(),
            profile_path: c.profile_path.clone(),
        })
        .collect();

    let similar = details
        .similar
        .as_ref()
        .map(|page| page.results.iter().map(|i| to_media_card(i, content_type)).collect())
        .unwrap_or_default();

    let card = MediaCard {
        id: details.id,
        content_type,
        title: pick_title(&details.title, &details.name),
        poster_path: non_empty(&details.poster_path),
        backdrop_path: non_empty(&details.backdrop_path),
        rating: details.vote_average.map(|v| v as f32),
        release_year: release_year(
            details
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(details.first_air_date.as_deref()),
        ),
        overview: non_empty(&details.overview),
    };

    MediaDetails {
        card,
        genres: details
            .genres
            .iter()
            .map(|g| Genre { id: g.id, name: g.name.clone() })
            .collect(),
        director,
        cast,
        trailer: find_trailer(&details.videos),
        similar,
    }
}

// --- Endpoint operations ---

impl TmdbClient {
    pub fn search(
        &self,
        content_type: ContentType,
        query: &str,
        page: u32,
    ) -> Result<ResultPage, ApiError> {
        let params = QueryParams::new()
            .with("query", query)
            .with("page", page)
            .with("include_adult", false);
        let raw: TmdbPage<TmdbListItem> =
            self.get_parsed_with_query(&format!("/search/{}", content_type), &params)?;
        Ok(to_result_page(raw, content_type))
    }

    pub fn discover(
        &self,
        content_type: ContentType,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<ResultPage, ApiError> {
        let params = QueryParams::new()
            .with("page", page)
            .with("sort_by", filters.sort.as_param(content_type))
            .with("include_adult", false)
            .with("with_genres", filters.genre)
            .with(content_type.year_param(), filters.year);
        let raw: TmdbPage<TmdbListItem> =
            self.get_parsed_with_query(&format!("/discover/{}", content_type), &params)?;
        Ok(to_result_page(raw, content_type))
    }

    /// This week's trending titles. Always page 1.
    pub fn trending(&self, content_type: ContentType) -> Result<ResultPage, ApiError> {
        let params = QueryParams::new().with("page", 1u32);
        let raw: TmdbPage<TmdbListItem> =
            self.get_parsed_with_query(&format!("/trending/{}/week", content_type), &params)?;
        Ok(to_result_page(raw, content_type))
    }

    pub fn listing(
        &self,
        content_type: ContentType,
        request: &ListingRequest,
        page: u32,
    ) -> Result<ResultPage, ApiError> {
        match request {
            ListingRequest::Search { query } => self.search(content_type, query, page),
            ListingRequest::Discover(filters) => self.discover(content_type, filters, page),
            ListingRequest::Trending => self.trending(content_type),
        }
    }

    pub fn genres(&self, content_type: ContentType) -> Result<Vec<Genre>, ApiError> {
        let raw: TmdbGenreList = self
            .get_parsed_with_query(&format!("/genre/{}/list", content_type), &QueryParams::new())?;
        Ok(raw
            .genres
            .into_iter()
            .map(|g| Genre { id: g.id, name: g.name })
            .collect())
    }

    pub fn details(&self, content_type: ContentType, id: u64) -> Result<MediaDetails, ApiError> {
        let params = QueryParams::new().with("append_to_response", DETAIL_APPENDS);
        let raw: TmdbDetails =
            self.get_parsed_with_query(&format!("/{}/{}", content_type, id), &params)?;
        Ok(to_media_details(raw, content_type))
    }

    /// Probe `/configuration`; true when the API answered successfully.
    pub fn check_connectivity(&self) -> bool {
        match self.get_with_query("/configuration", &QueryParams::new()) {
            Ok(_) => {
                log::info!("TMDB API is reachable");
                true
            }
            Err(e) => {
                log::warn!("TMDB connectivity check failed: {}", e);
                false
            }
        }
    }
}
