use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::pageviews::{ArticleCount, ArticleViews, PeakDay};
use crate::utils::time::format_date;

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DurationQuery {
    /// `week` or `month`
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleQuery {
    /// Exact, case-sensitive article title (e.g. `Albert_Einstein`)
    pub title: Option<String>,
    /// `week` or `month`
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleQuery {
    /// Exact, case-sensitive article title
    pub title: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// `[title, total_views]` pair in the ranked top-articles list
#[derive(Debug, Serialize, ToSchema)]
pub struct TopArticleEntry(pub String, pub u64);

impl From<ArticleCount> for TopArticleEntry {
    fn from(article: ArticleCount) -> Self {
        Self(article.title, article.views)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleViewsResponse {
    pub title: String,
    pub total_views: u64,
}

impl From<ArticleViews> for ArticleViewsResponse {
    fn from(views: ArticleViews) -> Self {
        Self {
            title: views.title,
            total_views: views.total_views,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeakDayResponse {
    pub title: String,
    pub max_views: u64,
    /// `YYYY-MM-DD`, or null when the article never appeared
    pub max_views_date: Option<String>,
}

impl From<PeakDay> for PeakDayResponse {
    fn from(peak: PeakDay) -> Self {
        Self {
            title: peak.title,
            max_views: peak.max_views,
            max_views_date: peak.date.map(format_date),
        }
    }
}
