//! HTTP surface of supporter-backend.
//!
//! This is intentionally a thin layer: one route, plus the cross-origin policy
//! that lets the local frontend dev servers talk to it. Undefined routes fall
//! through to axum's default 404.

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{Config, CorsConfig};

pub mod health;
pub mod request_id;

/// Shared state handed to every handler.
///
/// Everything here is read-only after startup; requests never mutate it.
#[derive(Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Deployment environment name, resolved once from `APP_ENV`.
    pub env: String,
}

impl AppState {
    pub fn new(config: Arc<Config>, env: String) -> Self {
        Self { config, env }
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);
    Router::new()
        .route("/health", get(health::health))
        .layer(cors)
        .with_state(state)
}

/// Cross-origin policy: explicit origin allow-list with credentials.
///
/// Credentialed CORS forbids the `*` wildcard, so methods and request headers
/// are mirrored back instead of wildcarded — equivalent to "allow all" for the
/// listed origins.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt; // oneshot

    use super::AppState;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(Config::default()), "local".into()))
    }

    // -----------------------------------------------------------------------
    // Cross-origin policy
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn allowed_origin_gets_permissive_headers_with_credentials() {
        let app = super::router(test_state());
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }

    #[tokio::test]
    async fn second_allowed_origin_is_also_accepted() {
        let app = super::router(test_state());
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_headers() {
        let app = super::router(test_state());
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        // The request itself still succeeds — the browser enforces the policy.
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn preflight_mirrors_requested_method() {
        let app = super::router(test_state());
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_success());
        let allowed_methods = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert!(allowed_methods.contains("GET"), "got: {allowed_methods}");
        let allowed_headers = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert!(allowed_headers.contains("authorization"), "got: {allowed_headers}");
    }

    // -----------------------------------------------------------------------
    // Routing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = super::router(test_state());
        let req = Request::builder()
            .method(Method::GET)
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
