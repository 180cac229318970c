//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all registry handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, CORS)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TrackerConfig;
use crate::http::handlers;
use crate::http::request::request_span;
use crate::lifecycle::Shutdown;
use crate::registry::RegistryStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RegistryStore>,
}

/// HTTP server for the registry.
pub struct TrackerServer {
    router: Router,
    store: Arc<RegistryStore>,
}

impl TrackerServer {
    /// Create a server with a fresh, empty registry.
    pub fn new(config: &TrackerConfig) -> Self {
        let store = Arc::new(RegistryStore::new(config.registry.clone()));
        let state = AppState {
            store: store.clone(),
        };

        let router = Self::build_router(config, state);
        Self { router, store }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &TrackerConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(handlers::index))
            .route("/url", get(handlers::get_url).post(handlers::publish_url))
            .route("/status", get(handlers::get_status))
            .route("/history", get(handlers::get_history))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        let router = if config.security.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The registry behind this server.
    pub fn store(&self) -> Arc<RegistryStore> {
        self.store.clone()
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Registry server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(Shutdown::signalled(shutdown))
            .await?;

        tracing::info!("Registry server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn post_json(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_url_before_publish() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let (status, json) = call(&router, get("/url")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No active backend found");
        assert_eq!(json["backend"]["url"], "");
    }

    #[tokio::test]
    async fn test_publish_then_lookup() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let (status, json) = call(&router, post_json("/url", r#"{"url": "https://abc.ngrok.io/"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "URL registered successfully");
        assert_eq!(json["backend"]["url"], "https://abc.ngrok.io");
        assert_eq!(json["backend"]["status"], "online");

        let (_, json) = call(&router, get("/url")).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["backend"]["url"], "https://abc.ngrok.io");
    }

    #[tokio::test]
    async fn test_invalid_publish_is_400_and_keeps_current() {
        let server = TrackerServer::new(&TrackerConfig::default());
        let router = server.router();
        call(&router, post_json("/url", r#"{"url": "https://abc.ngrok.io"}"#)).await;

        let (status, json) = call(&router, post_json("/url", r#"{"url": "not-a-url"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid URL format"));

        assert_eq!(server.store().lookup().descriptor.url, "https://abc.ngrok.io");
    }

    #[tokio::test]
    async fn test_missing_url_is_400() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        for body in [r#"{}"#, r#"{"url": ""}"#, "not json"] {
            let (status, json) = call(&router, post_json("/url", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
            assert_eq!(json["error"], "No URL provided");
        }
    }

    #[tokio::test]
    async fn test_status_and_history() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let (_, json) = call(&router, get("/status")).await;
        assert_eq!(json["online"], false);
        assert_eq!(json["last_updated"], "");

        call(&router, post_json("/url", r#"{"url": "https://a.ngrok.io"}"#)).await;
        call(&router, post_json("/url", r#"{"url": "https://b.ngrok.io", "model": "llava"}"#)).await;

        let (_, json) = call(&router, get("/status")).await;
        assert_eq!(json["online"], true);
        assert_eq!(json["model"], "llava");
        assert!(!json["last_updated"].as_str().unwrap().is_empty());
        assert!(json.get("stale").is_none());

        let (_, json) = call(&router, get("/history")).await;
        assert_eq!(json["current"]["url"], "https://b.ngrok.io");
        assert_eq!(json["history"][0]["url"], "https://a.ngrok.io");
        assert_eq!(json["history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_timestamps_share_one_wire_form() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let (_, json) = call(&router, get("/url")).await;
        assert_eq!(json["backend"]["last_updated"], "");

        call(&router, post_json("/url", r#"{"url": "https://a.ngrok.io"}"#)).await;
        call(&router, post_json("/url", r#"{"url": "https://b.ngrok.io"}"#)).await;

        let (_, url) = call(&router, get("/url")).await;
        let (_, status) = call(&router, get("/status")).await;
        let (_, history) = call(&router, get("/history")).await;

        let from_url = url["backend"]["last_updated"].as_str().unwrap();
        assert!(from_url.ends_with('Z'));
        assert_eq!(from_url.len(), "2026-10-14T12:00:00.000000Z".len());
        assert_eq!(status["last_updated"], from_url);
        assert_eq!(history["current"]["last_updated"], from_url);
        assert_eq!(
            history["history"][0]["last_used"].as_str().unwrap().len(),
            from_url.len()
        );
    }

    #[tokio::test]
    async fn test_status_reports_stale_with_ttl() {
        let mut config = TrackerConfig::default();
        config.registry.stale_after_secs = Some(0);
        let router = TrackerServer::new(&config).router();
        call(&router, post_json("/url", r#"{"url": "https://a.ngrok.io"}"#)).await;
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let (_, json) = call(&router, get("/status")).await;
        assert_eq!(json["stale"], true);
        assert_eq!(json["online"], false);

        let (_, json) = call(&router, get("/url")).await;
        assert_eq!(json["success"], true, "lookup is never filtered by age");
        assert_eq!(json["stale"], true);
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let (status, json) = call(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "Caption Backend Tracker");
        assert!(json["timestamp"].as_str().is_some());

        let (_, json) = call(&router, get("/")).await;
        assert!(json["endpoints"]["POST /url"].is_string());
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let router = TrackerServer::new(&TrackerConfig::default()).router();
        let response = router.oneshot(get("/health")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
