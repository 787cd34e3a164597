// TMDB Module
//
// Handles:
// - Request URL construction and the optional CORS relay
// - HTTP status classification into user-facing errors
// - Listing, genre, detail and connectivity endpoints

pub mod catalog;
pub mod client;
pub mod error;
pub mod types;

pub use catalog::{DiscoverFilters, ListingRequest};
pub use client::{HttpResponse, HttpTransport, QueryParams, TmdbClient, UreqTransport};
pub use error::ApiError;
