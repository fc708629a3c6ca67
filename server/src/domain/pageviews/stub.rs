//! Test doubles for the upstream service

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDate;
use tokio::task::JoinHandle;

use super::error::FetchError;
use super::fetcher::DaySource;
use super::types::{ArticleCount, PageviewDay};

type Script = HashMap<NaiveDate, VecDeque<(u16, String)>>;

#[derive(Default)]
struct StubState {
    script: Mutex<Script>,
    hits: AtomicUsize,
}

/// Scripted upstream HTTP server on an ephemeral local port.
///
/// Each date has a queue of `(status, body)` responses; the last entry repeats.
/// Dates without a script answer 404.
pub(crate) struct StubUpstream {
    base_url: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubUpstream {
    pub(crate) async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/top/{year}/{month}/{day}", get(respond))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/top", addr),
            state,
            handle,
        }
    }

    pub(crate) fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub(crate) fn script(&self, date: NaiveDate, responses: Vec<(u16, String)>) {
        self.state
            .script
            .lock()
            .unwrap()
            .insert(date, responses.into());
    }

    pub(crate) fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<Arc<StubState>>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut script = state.script.lock().unwrap();
    let next = script.get_mut(&date).and_then(|queue| {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    });

    match next {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, [("content-type", "application/json")], body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Upstream-shaped JSON body for one day
pub(crate) fn day_body(articles: &[(&str, u64)]) -> String {
    let articles: Vec<_> = articles
        .iter()
        .enumerate()
        .map(|(i, (title, views))| {
            serde_json::json!({ "article": title, "views": views, "rank": i + 1 })
        })
        .collect();
    serde_json::json!({
        "items": [{
            "project": "en.wikipedia",
            "access": "all-access",
            "articles": articles,
        }]
    })
    .to_string()
}

/// In-memory day source; unknown dates yield an empty day
#[derive(Default)]
pub(crate) struct StaticSource {
    days: HashMap<NaiveDate, Result<PageviewDay, FetchError>>,
    calls: Mutex<Vec<NaiveDate>>,
}

impl StaticSource {
    pub(crate) fn with_day(mut self, date: NaiveDate, articles: &[(&str, u64)]) -> Self {
        let day = PageviewDay::new(
            articles
                .iter()
                .map(|(title, views)| ArticleCount::new(*title, *views))
                .collect(),
        );
        self.days.insert(date, Ok(day));
        self
    }

    pub(crate) fn with_error(mut self, date: NaiveDate, error: FetchError) -> Self {
        self.days.insert(date, Err(error));
        self
    }

    pub(crate) fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }

    /// 2024-01-01 has `[A 10, B 5]`; 2024-01-02 through 2024-01-07 have `[A 1]`
    pub(crate) fn january_week() -> Self {
        (2..=7).fold(
            Self::default().with_day(jan(1), &[("A", 10), ("B", 5)]),
            |source, d| source.with_day(jan(d), &[("A", 1)]),
        )
    }
}

#[async_trait]
impl DaySource for StaticSource {
    async fn fetch(&self, date: NaiveDate) -> Result<PageviewDay, FetchError> {
        self.calls.lock().unwrap().push(date);
        self.days.get(&date).cloned().unwrap_or_else(|| Ok(PageviewDay::default()))
    }
}

pub(crate) fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}
