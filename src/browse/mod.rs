// Browse Module
//
// Handles:
// - Query state and its reducer
// - Debounced search/filter input and throttled scroll sampling
// - Fetch sequencing (no overlap, stale responses dropped)
// - Session metrics

pub mod controller;
pub mod metrics;
pub mod scheduler;
pub mod state;

pub use controller::{Discovery, FetchOutcome, ScrollPosition};
pub use metrics::{Metrics, MetricsSnapshot};
pub use state::{Completion, FetchPlan, QueryAction, QueryState};
