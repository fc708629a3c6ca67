//! Domain logic for pageview aggregation
//!
//! - `pageviews` - daily top-article fetching and range aggregation

pub mod pageviews;
