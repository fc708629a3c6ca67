//! Daily top-article pageviews and aggregations over date ranges
//!
//! `DayFetcher` retrieves one day from the upstream service, retrying while it is
//! rate limited. `RangeAggregator` walks a `DateRange` day by day and folds the
//! results into top-article totals, one article's views, or its peak day.

mod aggregate;
mod error;
mod fetcher;
mod input;
mod range;
#[cfg(test)]
pub(crate) mod stub;
mod types;

pub use aggregate::RangeAggregator;
pub use error::{FetchError, InputError};
pub use fetcher::{DayFetcher, DaySource, decode_day};
pub use input::{parse_date, require_title};
pub use range::{DateRange, DurationToken, MonthPolicy};
pub use types::{ArticleCount, ArticleViews, PageviewDay, PeakDay, PeakRecord};
