//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Health check
//!
//! # Static pages
//! GET  /                               - Getting Started
//! GET  /help                           - Help
//! *                                    - Not Found (404)
//!
//! # Inventory
//! GET  /inventory                      - Inventory page
//! GET  /inventory/section              - Variants section fragment
//! GET  /inventory/variants/{id}/edit   - Variant edit modal
//! POST /inventory/variants/{id}        - Save variant draft
//!
//! # Users
//! GET  /users                          - Users page
//! GET  /users/section                  - Users section fragment
//! POST /users/{id}/role                - Update a user's role (returns the role cell)
//! ```
//!
//! Every route reads the session token from the `context` query parameter.

pub mod inventory;
pub mod pages;
pub mod users;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::getting_started))
        .route("/help", get(pages::help))
        // Inventory
        .route("/inventory", get(inventory::index))
        .route("/inventory/section", get(inventory::section))
        .route("/inventory/variants/{id}/edit", get(inventory::edit))
        .route("/inventory/variants/{id}", post(inventory::save))
        // Users
        .route("/users", get(users::index))
        .route("/users/section", get(users::section))
        .route("/users/{id}/role", post(users::update_role))
        .fallback(pages::not_found)
}

/// Full application: routes, health check and request tracing.
///
/// Sentry layers are added by the binary around this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    // Only the path: the query carries the session token.
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

/// Render a template, logging failures.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{BackendConfig, CacheConfig, DashboardConfig};
    use crate::sections::UNAUTHENTICATED_MESSAGE;

    // Nothing listens on port 9; any backend call would fail the test.
    fn test_app() -> Router {
        let config = DashboardConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            backend: BackendConfig {
                api_url: url::Url::parse("http://127.0.0.1:9").unwrap(),
                timeout: None,
            },
            sdk_url: "https://cdn.example.com/sdk.js".to_string(),
            cache: CacheConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        app(AppState::new(config).unwrap())
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_sections_without_token_are_unauthenticated() {
        for path in ["/inventory", "/inventory/section", "/users", "/users/section"] {
            let response = test_app()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            let body = body_text(response).await;
            assert!(body.contains(UNAUTHENTICATED_MESSAGE), "{path}");
            assert!(!body.contains("bc-sdk-js"), "{path}");
        }
    }

    #[tokio::test]
    async fn test_page_with_token_injects_sdk() {
        let response = test_app()
            .oneshot(Request::get("/help?context=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains(r#"id="bc-sdk-js""#));
        assert!(body.contains("context=abc"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = test_app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_assigning_owner_is_rejected() {
        let request = Request::post("/users/5/role?context=abc")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("role=owner&original=viewer"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_modal_prefills_snapshot() {
        let uri = concat!(
            "/inventory/variants/7/edit?context=abc",
            "&product_id=3&sku=SKU-7&tracking=product&inventory=12"
        );
        let response = test_app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Editing SKU: SKU-7"));
        assert!(body.contains(r#"value="12""#));
        assert!(body.contains(r#"id="variant-modal-7""#));
    }

    #[tokio::test]
    async fn test_unchanged_save_closes_without_backend_call() {
        let request = Request::post("/inventory/variants/7?context=abc")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                concat!(
                    "product_id=3&sku=SKU-7&original_tracking=product",
                    "&original_inventory=12&tracking=product&inventory=12"
                ),
            ))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("HX-Trigger").is_none());
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_count_shows_validation_error() {
        let request = Request::post("/inventory/variants/7?context=abc")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                concat!(
                    "product_id=3&sku=SKU-7&original_tracking=product",
                    "&original_inventory=12&tracking=product&inventory=1000001"
                ),
            ))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("inline-error"));
        assert!(body.contains(r#"value="1000001""#));
    }
}
