//! Pageview aggregation endpoints
//!
//! Explicit-start routes take the start date (or month) in the path; trailing
//! routes anchor the window on today's date. All validation happens before the
//! first upstream request.

pub mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;

use crate::api::extractors::{ApiQuery, DatePath, MonthPath};
use crate::api::types::{ApiError, ErrorBody};
use crate::domain::pageviews::{
    DateRange, DurationToken, FetchError, MonthPolicy, RangeAggregator, require_title,
};
use crate::utils::time::Clock;

pub use types::{
    ArticleQuery, ArticleViewsResponse, DurationQuery, PeakDayResponse, TitleQuery,
    TopArticleEntry,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct PageviewsApiState {
    pub aggregator: Arc<RangeAggregator>,
    pub clock: Arc<dyn Clock>,
    pub month_policy: MonthPolicy,
    pub request_timeout: Duration,
    /// Cancelled on server shutdown
    pub cancel: CancellationToken,
}

impl PageviewsApiState {
    fn trailing(&self, duration: Option<&str>) -> Result<DateRange, ApiError> {
        let token = DurationToken::parse(duration)?;
        Ok(DateRange::trailing(self.clock.today(), token)?)
    }

    /// Run one aggregation under the request timeout
    async fn bounded<T, F>(&self, aggregation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        match tokio::time::timeout(self.request_timeout, aggregation).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.request_timeout.as_secs_f64(),
                    "Range aggregation timed out"
                );
                Err(ApiError::gateway_timeout("Request timed out."))
            }
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn routes(state: PageviewsApiState) -> Router<()> {
    Router::new()
        .route("/top-articles/{year}/{month}/{day}", get(top_articles))
        .route("/top-articles", get(top_articles_trailing))
        .route("/article-views/{year}/{month}/{day}", get(article_views))
        .route("/article-views", get(article_views_trailing))
        .route("/max-views-day/{year}/{month}", get(max_views_day))
        .route("/max-views-day", get(max_views_day_trailing))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Articles ranked by total views over a week or month starting at the given date
#[utoipa::path(
    get,
    path = "/top-articles/{year}/{month}/{day}",
    tag = "pageviews",
    params(
        ("year" = String, Path, description = "Start year"),
        ("month" = String, Path, description = "Start month (1-12)"),
        ("day" = String, Path, description = "Start day of month"),
        DurationQuery
    ),
    responses(
        (status = 200, description = "`[title, total_views]` pairs, highest first", body = Vec<TopArticleEntry>),
        (status = 400, description = "Invalid date or duration", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn top_articles(
    State(state): State<PageviewsApiState>,
    DatePath(start): DatePath,
    ApiQuery(query): ApiQuery<DurationQuery>,
) -> Result<Json<Vec<TopArticleEntry>>, ApiError> {
    let token = DurationToken::parse(query.duration.as_deref())?;
    let range = DateRange::from_start(start, token, state.month_policy)?;

    let top = state
        .bounded(state.aggregator.top_articles(range, &state.cancel))
        .await?;
    Ok(Json(top.into_iter().map(TopArticleEntry::from).collect()))
}

/// Articles ranked by total views over the trailing week or month
#[utoipa::path(
    get,
    path = "/top-articles",
    tag = "pageviews",
    params(DurationQuery),
    responses(
        (status = 200, description = "`[title, total_views]` pairs, highest first", body = Vec<TopArticleEntry>),
        (status = 400, description = "Invalid duration", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn top_articles_trailing(
    State(state): State<PageviewsApiState>,
    ApiQuery(query): ApiQuery<DurationQuery>,
) -> Result<Json<Vec<TopArticleEntry>>, ApiError> {
    let range = state.trailing(query.duration.as_deref())?;

    let top = state
        .bounded(state.aggregator.top_articles(range, &state.cancel))
        .await?;
    Ok(Json(top.into_iter().map(TopArticleEntry::from).collect()))
}

/// Total views of one article over a week or month starting at the given date
#[utoipa::path(
    get,
    path = "/article-views/{year}/{month}/{day}",
    tag = "pageviews",
    params(
        ("year" = String, Path, description = "Start year"),
        ("month" = String, Path, description = "Start month (1-12)"),
        ("day" = String, Path, description = "Start day of month"),
        ArticleQuery
    ),
    responses(
        (status = 200, description = "Total views in range", body = ArticleViewsResponse),
        (status = 400, description = "Invalid date, missing title or invalid duration", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn article_views(
    State(state): State<PageviewsApiState>,
    DatePath(start): DatePath,
    ApiQuery(query): ApiQuery<ArticleQuery>,
) -> Result<Json<ArticleViewsResponse>, ApiError> {
    let title = require_title(query.title)?;
    let token = DurationToken::parse(query.duration.as_deref())?;
    let range = DateRange::from_start(start, token, state.month_policy)?;

    let views = state
        .bounded(state.aggregator.article_views(range, &title, &state.cancel))
        .await?;
    Ok(Json(views.into()))
}

/// Total views of one article over the trailing week or month
#[utoipa::path(
    get,
    path = "/article-views",
    tag = "pageviews",
    params(ArticleQuery),
    responses(
        (status = 200, description = "Total views in range", body = ArticleViewsResponse),
        (status = 400, description = "Missing title or invalid duration", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn article_views_trailing(
    State(state): State<PageviewsApiState>,
    ApiQuery(query): ApiQuery<ArticleQuery>,
) -> Result<Json<ArticleViewsResponse>, ApiError> {
    let title = require_title(query.title)?;
    let range = state.trailing(query.duration.as_deref())?;

    let views = state
        .bounded(state.aggregator.article_views(range, &title, &state.cancel))
        .await?;
    Ok(Json(views.into()))
}

/// Day of the given calendar month on which an article had the most views
#[utoipa::path(
    get,
    path = "/max-views-day/{year}/{month}",
    tag = "pageviews",
    params(
        ("year" = String, Path, description = "Year"),
        ("month" = String, Path, description = "Month (1-12)"),
        TitleQuery
    ),
    responses(
        (status = 200, description = "Peak day; earliest date wins a tie", body = PeakDayResponse),
        (status = 400, description = "Invalid month or missing title", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn max_views_day(
    State(state): State<PageviewsApiState>,
    MonthPath(range): MonthPath,
    ApiQuery(query): ApiQuery<TitleQuery>,
) -> Result<Json<PeakDayResponse>, ApiError> {
    let title = require_title(query.title)?;

    let peak = state
        .bounded(state.aggregator.max_views_day(range, &title, &state.cancel))
        .await?;
    Ok(Json(peak.into()))
}

/// Day in the trailing week or month on which an article had the most views
#[utoipa::path(
    get,
    path = "/max-views-day",
    tag = "pageviews",
    params(ArticleQuery),
    responses(
        (status = 200, description = "Peak day; earliest date wins a tie", body = PeakDayResponse),
        (status = 400, description = "Missing title or invalid duration", body = ErrorBody),
        (status = 500, description = "Upstream fetch failed", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody),
        (status = 504, description = "Request timed out", body = ErrorBody)
    )
)]
pub async fn max_views_day_trailing(
    State(state): State<PageviewsApiState>,
    ApiQuery(query): ApiQuery<ArticleQuery>,
) -> Result<Json<PeakDayResponse>, ApiError> {
    let title = require_title(query.title)?;
    let range = state.trailing(query.duration.as_deref())?;

    let peak = state
        .bounded(state.aggregator.max_views_day(range, &title, &state.cancel))
        .await?;
    Ok(Json(peak.into()))
}
