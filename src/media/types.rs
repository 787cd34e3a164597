// Media Data Types
//
// Normalized records handed to the renderer. Upstream wire shapes live in
// tmdb::types and are mapped into these by tmdb::catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which half of the catalog is being browsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl ContentType {
    /// Path segment used by the upstream API (`/search/movie`, `/discover/tv`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "tv",
        }
    }

    /// Discovery parameter carrying the release-year filter.
    pub fn year_param(&self) -> &'static str {
        match self {
            ContentType::Movie => "primary_release_year",
            ContentType::Series => "first_air_date_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movies",
            ContentType::Series => "TV Shows",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentType::Movie),
            "tv" | "series" => Ok(ContentType::Series),
            other => Err(format!("Unknown content type: {}", other)),
        }
    }
}

/// Discovery ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PopularityDesc,
    PopularityAsc,
    RatingDesc,
    RatingAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
}

impl SortKey {
    /// `sort_by` value for a discovery request. Release-date ordering uses a
    /// different field name for series.
    pub fn as_param(&self, content_type: ContentType) -> &'static str {
        match (self, content_type) {
            (SortKey::PopularityDesc, _) => "popularity.desc",
            (SortKey::PopularityAsc, _) => "popularity.asc",
            (SortKey::RatingDesc, _) => "vote_average.desc",
            (SortKey::RatingAsc, _) => "vote_average.asc",
            (SortKey::ReleaseDateDesc, ContentType::Movie) => "primary_release_date.desc",
            (SortKey::ReleaseDateAsc, ContentType::Movie) => "primary_release_date.asc",
            (SortKey::ReleaseDateDesc, ContentType::Series) => "first_air_date.desc",
            (SortKey::ReleaseDateAsc, ContentType::Series) => "first_air_date.asc",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popularity.desc" => Ok(SortKey::PopularityDesc),
            "popularity.asc" => Ok(SortKey::PopularityAsc),
            "vote_average.desc" => Ok(SortKey::RatingDesc),
            "vote_average.asc" => Ok(SortKey::RatingAsc),
            "primary_release_date.desc" | "first_air_date.desc" | "release_date.desc" => {
                Ok(SortKey::ReleaseDateDesc)
            }
            "primary_release_date.asc" | "first_air_date.asc" | "release_date.asc" => {
                Ok(SortKey::ReleaseDateAsc)
            }
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

/// One result item, as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCard {
    pub id: u64,
    pub content_type: ContentType,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// 0-10 vote average
    pub rating: Option<f32>,
    pub release_year: Option<i32>,
    pub overview: Option<String>,
}

impl MediaCard {
    /// Rating formatted the way cards show it (`7.4` or `N/A`)
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) if r > 0.0 => format!("{:.1}", r),
            _ => "N/A".to_string(),
        }
    }
}

/// One page of normalized results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub page: u32,
    pub results: Vec<MediaCard>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: Option<String>,
    pub embed_url: String,
}

/// Everything the details modal shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub card: MediaCard,
    pub genres: Vec<Genre>,
    pub director: Option<String>,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Trailer>,
    pub similar: Vec<MediaCard>,
}
