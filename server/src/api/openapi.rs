//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, pageviews};
use crate::api::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pageviews API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Aggregated Wikipedia top-article pageviews"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "pageviews", description = "Top articles, article totals and peak days")
    ),
    paths(
        health::health,
        pageviews::top_articles,
        pageviews::top_articles_trailing,
        pageviews::article_views,
        pageviews::article_views_trailing,
        pageviews::max_views_day,
        pageviews::max_views_day_trailing,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        pageviews::TopArticleEntry,
        pageviews::ArticleViewsResponse,
        pageviews::PeakDayResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pageviews API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/top-articles/{year}/{month}/{day}",
            "/top-articles",
            "/article-views/{year}/{month}/{day}",
            "/article-views",
            "/max-views-day/{year}/{month}",
            "/max-views-day",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_pageview_routes_document_shutdown_and_timeout() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        for path in [
            "/top-articles/{year}/{month}/{day}",
            "/top-articles",
            "/article-views/{year}/{month}/{day}",
            "/article-views",
            "/max-views-day/{year}/{month}",
            "/max-views-day",
        ] {
            let responses = &doc["paths"][path]["get"]["responses"];
            for status in ["400", "500", "503", "504"] {
                assert!(
                    responses[status].is_object(),
                    "{path} does not document {status}"
                );
            }
        }
    }
}
