//! API server initialization

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::health;
use super::routes::pageviews::{self, PageviewsApiState};
use crate::core::CoreApp;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse()
                .with_context(|| format!("Invalid server host: {}", host))?,
            port,
        );

        let state = PageviewsApiState {
            aggregator: app.aggregator.clone(),
            clock: app.clock.clone(),
            month_policy: app.config.range.month_policy,
            request_timeout: app.config.server.request_timeout,
            cancel: shutdown.cancellation_token(),
        };
        let router = build_router(state);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(%addr, "Listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

pub(crate) fn build_router(state: PageviewsApiState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .merge(pageviews::routes(state))
        .fallback(middleware::handle_404)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use crate::domain::pageviews::stub::{StaticSource, jan};
    use crate::domain::pageviews::{MonthPolicy, RangeAggregator};
    use crate::utils::time::ManualClock;

    fn router() -> Router {
        build_router(PageviewsApiState {
            aggregator: Arc::new(RangeAggregator::new(Arc::new(StaticSource::january_week()))),
            clock: Arc::new(ManualClock::new(jan(7))),
            month_policy: MonthPolicy::Rolling,
            request_timeout: Duration::from_secs(30),
            cancel: CancellationToken::new(),
        })
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get("/top-articles/2024/01").await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "Not found." }));
    }

    #[tokio::test]
    async fn test_openapi_json_served() {
        let (status, body) = get("/api/openapi.json").await;
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/top-articles/{year}/{month}/{day}"].is_object());
    }

    #[tokio::test]
    async fn test_docs_page_served() {
        let (status, body) = get("/api/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("swagger-ui"));
    }

    #[tokio::test]
    async fn test_pageview_routes_merged() {
        let (status, body) = get("/top-articles/2024/01/01?duration=week").await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([["A", 16], ["B", 5]]));
    }
}
