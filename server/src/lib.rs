//! Wikipedia top-pageviews aggregation service
//!
//! Proxies the Wikimedia daily top-articles endpoint and aggregates it over
//! weeks and months: ranked totals, one article's total views, and the day an
//! article peaked.

pub mod api;
mod app;
pub mod core;
pub mod domain;
pub mod utils;
