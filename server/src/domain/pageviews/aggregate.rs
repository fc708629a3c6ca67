//! Range aggregations over consecutive days

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use super::error::FetchError;
use super::fetcher::DaySource;
use super::range::DateRange;
use super::types::{ArticleCount, ArticleViews, PageviewDay, PeakDay, PeakRecord};

/// Folds a day source over a date range, one day at a time in chronological order.
///
/// The first failing day aborts the whole aggregation and discards partial results.
#[derive(Clone)]
pub struct RangeAggregator {
    source: Arc<dyn DaySource>,
}

impl RangeAggregator {
    pub fn new(source: Arc<dyn DaySource>) -> Self {
        Self { source }
    }

    async fn traverse<F>(
        &self,
        range: DateRange,
        cancel: &CancellationToken,
        mut visit: F,
    ) -> Result<(), FetchError>
    where
        F: FnMut(NaiveDate, PageviewDay),
    {
        tracing::debug!(
            start = %range.start(),
            end = %range.end(),
            days = range.len_days(),
            "Aggregating range"
        );

        for date in range.days() {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(FetchError::Cancelled),
                result = self.source.fetch(date) => result,
            };

            match result {
                Ok(day) => visit(date, day),
                Err(e) => {
                    tracing::warn!(%date, error = %e, "Aborting range aggregation");
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Total views per article across the range, highest first; ties by title
    pub async fn top_articles(
        &self,
        range: DateRange,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArticleCount>, FetchError> {
        let mut totals: HashMap<String, u64> = HashMap::new();

        self.traverse(range, cancel, |_, day| {
            for article in day.into_articles() {
                let total = totals.entry(article.title).or_default();
                *total = total.saturating_add(article.views);
            }
        })
        .await?;

        let mut ranked: Vec<ArticleCount> = totals
            .into_iter()
            .map(|(title, views)| ArticleCount { title, views })
            .collect();
        ranked.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.title.cmp(&b.title)));
        Ok(ranked)
    }

    /// Sum of one article's daily views; days it is absent count as zero
    pub async fn article_views(
        &self,
        range: DateRange,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<ArticleViews, FetchError> {
        let mut total_views = 0u64;

        self.traverse(range, cancel, |_, day| {
            total_views = total_views.saturating_add(day.views_for(title).unwrap_or(0));
        })
        .await?;

        Ok(ArticleViews {
            title: title.to_string(),
            total_views,
        })
    }

    /// Day with the article's highest views; the earliest wins a tie
    pub async fn max_views_day(
        &self,
        range: DateRange,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<PeakDay, FetchError> {
        let mut peak = PeakRecord::default();

        self.traverse(range, cancel, |date, day| {
            if let Some(views) = day.views_for(title) {
                peak.observe(date, views);
            }
        })
        .await?;

        Ok(PeakDay {
            title: title.to_string(),
            max_views: peak.max_views,
            date: peak.date,
        })
    }
}
