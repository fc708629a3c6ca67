use chrono::NaiveDate;
use serde::Deserialize;

/// One article and its view count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCount {
    pub title: String,
    pub views: u64,
}

impl ArticleCount {
    pub fn new(title: impl Into<String>, views: u64) -> Self {
        Self {
            title: title.into(),
            views,
        }
    }
}

/// Ranked article list for a single day, in upstream order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageviewDay {
    articles: Vec<ArticleCount>,
}

impl PageviewDay {
    pub fn new(articles: Vec<ArticleCount>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[ArticleCount] {
        &self.articles
    }

    /// Views of the first article whose title matches exactly
    pub fn views_for(&self, title: &str) -> Option<u64> {
        self.articles
            .iter()
            .find(|a| a.title == title)
            .map(|a| a.views)
    }

    pub fn into_articles(self) -> Vec<ArticleCount> {
        self.articles
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleViews {
    pub title: String,
    pub total_views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakDay {
    pub title: String,
    pub max_views: u64,
    /// `None` when the article never had a positive count in range
    pub date: Option<NaiveDate>,
}

/// Running maximum over a chronological scan; ties keep the earliest date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakRecord {
    pub max_views: u64,
    pub date: Option<NaiveDate>,
}

impl PeakRecord {
    pub fn observe(&mut self, date: NaiveDate, views: u64) {
        if views > self.max_views {
            self.max_views = views;
            self.date = Some(date);
        }
    }
}

// Upstream payload

#[derive(Debug, Deserialize)]
pub(crate) struct TopResponse {
    pub items: Option<Vec<TopItem>>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopItem {
    #[serde(default)]
    pub articles: Vec<TopArticle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopArticle {
    pub article: String,
    pub views: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_views_for_first_exact_match() {
        let day = PageviewDay::new(vec![
            ArticleCount::new("Main_Page", 100),
            ArticleCount::new("Rust", 7),
            ArticleCount::new("Rust", 3),
        ]);
        assert_eq!(day.views_for("Rust"), Some(7));
        assert_eq!(day.views_for("rust"), None);
        assert_eq!(day.views_for("Python"), None);
    }

    #[test]
    fn test_empty_day() {
        let day = PageviewDay::default();
        assert!(day.articles().is_empty());
        assert_eq!(day.views_for("Rust"), None);
    }

    #[test]
    fn test_peak_record_keeps_earliest_tie() {
        let mut peak = PeakRecord::default();
        peak.observe(date(1), 5);
        peak.observe(date(2), 9);
        peak.observe(date(3), 9);
        peak.observe(date(4), 2);

        assert_eq!(peak.max_views, 9);
        assert_eq!(peak.date, Some(date(2)));
    }

    #[test]
    fn test_peak_record_zero_views_has_no_date() {
        let mut peak = PeakRecord::default();
        peak.observe(date(1), 0);
        peak.observe(date(2), 0);

        assert_eq!(peak.max_views, 0);
        assert_eq!(peak.date, None);
    }
}
