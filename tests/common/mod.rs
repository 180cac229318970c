//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use caption_tracker::config::DiscoveryConfig;
use caption_tracker::config::GenerationConfig;
use caption_tracker::{Shutdown, TrackerConfig, TrackerServer};

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a live registry. Keep the returned `Shutdown` alive for the test.
pub async fn start_registry(config: TrackerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = TrackerServer::new(&config);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

/// How a mock GPU backend behaves.
#[derive(Clone)]
pub struct MockBackend {
    pub health_status: StatusCode,
    pub generate_status: StatusCode,
    pub generate_body: Value,
    pub delay: Duration,
    /// Last `/generate-captions` body received.
    pub received: Arc<Mutex<Option<Value>>>,
}

impl MockBackend {
    pub fn returning(body: Value) -> Self {
        Self {
            health_status: StatusCode::OK,
            generate_status: StatusCode::OK,
            generate_body: body,
            delay: Duration::ZERO,
            received: Arc::new(Mutex::new(None)),
        }
    }

    pub fn last_request(&self) -> Option<Value> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a mock backend exposing `/health` and `/generate-captions`.
pub async fn start_mock_backend(mock: MockBackend) -> SocketAddr {
    let health_status = mock.health_status;
    let generate = mock.clone();

    let router = Router::new()
        .route("/health", get(move || async move { (health_status, "ok") }))
        .route(
            "/generate-captions",
            post(move |Json(body): Json<Value>| {
                let mock = generate.clone();
                async move {
                    *mock.received.lock().unwrap() = Some(body);
                    if !mock.delay.is_zero() {
                        tokio::time::sleep(mock.delay).await;
                    }
                    (mock.generate_status, Json(mock.generate_body.clone()))
                }
            }),
        );

    serve(router).await
}

/// An address with nothing listening on it.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn discovery_config(registry: SocketAddr) -> DiscoveryConfig {
    DiscoveryConfig {
        tracker_url: format!("http://{}", registry),
        lookup_timeout_secs: 2,
        probe_timeout_secs: 2,
        use_system_proxy: false,
        ..DiscoveryConfig::default()
    }
}

pub fn generation_config() -> GenerationConfig {
    GenerationConfig {
        use_system_proxy: false,
        ..GenerationConfig::default()
    }
}

/// A small JPEG, so tests can see it re-encoded as PNG.
pub fn test_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Publish `url` to the registry at `registry`.
pub async fn publish(registry: SocketAddr, url: &str) -> Value {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .post(format!("http://{}/url", registry))
        .json(&serde_json::json!({ "url": url }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}
