//! Aggregated views over a user's transactions.
//!
//! [aggregation] holds the pure functions, the rest serves them over HTTP.

pub mod aggregation;
mod handlers;
mod summary;

pub use handlers::{
    ActivityQuery, ActivityResponse, MAX_SUMMARY_MONTHS, SummaryQuery, get_activity_endpoint,
    get_summary_endpoint,
};
pub use summary::{CategoryBreakdown, DEFAULT_SUMMARY_MONTHS, Summary, summarize};
