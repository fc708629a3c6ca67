//! Per-day upstream fetch with rate-limit retry

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use super::error::FetchError;
use super::types::{ArticleCount, PageviewDay, TopResponse};
use crate::core::config::UpstreamConfig;
use crate::utils::retry::{Attempt, RetryError, RetryPolicy, retry_with_policy};
use crate::utils::time::Clock;

const DEFAULT_UPSTREAM_ERROR: &str = "An error occurred.";

/// Anything that can produce one day of ranked pageview data
#[async_trait]
pub trait DaySource: Send + Sync {
    async fn fetch(&self, date: NaiveDate) -> Result<PageviewDay, FetchError>;
}

/// HTTP client for the upstream top-articles endpoint
pub struct DayFetcher {
    http_client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl DayFetcher {
    pub fn new(config: &UpstreamConfig, clock: Arc<dyn Clock>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: config.retry_policy(),
            clock,
        })
    }

    /// Upstream URL for one day: `{base}/YYYY/MM/DD`
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.base_url, date.format("%Y/%m/%d"))
    }

    async fn attempt(&self, url: &str) -> Attempt<PageviewDay, FetchError> {
        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "Upstream request failed");
                return Attempt::Fail(FetchError::Transport(e.to_string()));
            }
        };

        match response.status() {
            StatusCode::FORBIDDEN => {
                tracing::debug!(url, "Rate limited by upstream");
                Attempt::Retry(FetchError::UnexpectedStatus(StatusCode::FORBIDDEN.as_u16()))
            }
            StatusCode::OK => match response.bytes().await {
                Ok(body) => match decode_day(&body) {
                    Ok(day) => Attempt::Done(day),
                    Err(e) => Attempt::Fail(e),
                },
                Err(e) => Attempt::Fail(FetchError::Transport(e.to_string())),
            },
            status => {
                tracing::warn!(url, status = status.as_u16(), "Unexpected upstream status");
                Attempt::Fail(FetchError::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl DaySource for DayFetcher {
    async fn fetch(&self, date: NaiveDate) -> Result<PageviewDay, FetchError> {
        let url = self.url_for(date);
        tracing::debug!(%date, url = %url, "Fetching top articles");

        let fetcher = self;
        let url = url.as_str();
        let result =
            retry_with_policy(self.policy, self.clock.as_ref(), move || fetcher.attempt(url))
                .await;

        match result {
            Ok(day) => {
                tracing::debug!(%date, articles = day.articles().len(), "Fetched top articles");
                Ok(day)
            }
            Err(RetryError::Exhausted { attempts, .. }) => {
                tracing::warn!(%date, attempts, "Giving up after repeated rate limiting");
                Err(FetchError::MaxRetriesExceeded { attempts })
            }
            Err(RetryError::Fatal(e)) => Err(e),
        }
    }
}

/// Decode one upstream response body into a day of articles.
///
/// Missing `items`, an empty `items` array, or a missing `articles` list all
/// decode to an empty day; a payload that does not match the expected shape is
/// a decode error.
pub fn decode_day(body: &[u8]) -> Result<PageviewDay, FetchError> {
    let response: TopResponse = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode upstream payload");
        FetchError::Decode {
            detail: e.to_string(),
        }
    })?;

    if let Some(error) = response.error {
        return Err(FetchError::Upstream(upstream_message(&error)));
    }

    let articles = response
        .items
        .and_then(|items| items.into_iter().next())
        .map(|item| item.articles)
        .unwrap_or_default()
        .into_iter()
        .map(|a| ArticleCount::new(a.article, a.views))
        .collect();

    Ok(PageviewDay::new(articles))
}

/// Message carried by an upstream `error` field: `error.info`, or the string itself
fn upstream_message(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(message) => message.clone(),
        serde_json::Value::Object(fields) => fields
            .get("info")
            .and_then(|info| info.as_str())
            .unwrap_or(DEFAULT_UPSTREAM_ERROR)
            .to_string(),
        _ => DEFAULT_UPSTREAM_ERROR.to_string(),
    }
}
