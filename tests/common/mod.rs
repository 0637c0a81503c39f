//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router (error pages included) against a
//! `MockSource`: a small axum server bound to an OS-assigned port that plays
//! the role of the remote sales endpoint.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::RawQuery;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use vendas::config::Config;
use vendas::server;
use vendas::services::sales_source::SalesSource;
use vendas::state::{AppState, JsManifest};

/// Ten sales over SP/RJ, two categories, three sellers, Jan and Feb 2022.
pub const FIXTURE: &str = include_str!("../fixtures/vendas.json");

/// A fake sales endpoint answering every request with the same response.
pub struct MockSource {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockSource {
    /// Serve `body` with `status` on `/produtos`.
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let body: String = body.into();

        let app = Router::new().route(
            "/produtos",
            get(move |RawQuery(query): RawQuery| {
                let recorded = recorded.clone();
                let body = body.clone();
                async move {
                    recorded.lock().unwrap().push(query.unwrap_or_default());
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let (port, handle) = server::serve(app, "127.0.0.1", 0)
            .await
            .expect("Failed to start mock source");

        Self {
            url: format!("http://127.0.0.1:{}/produtos", port),
            requests,
            handle: Some(handle),
        }
    }

    /// Serve the ten-sale fixture.
    pub async fn fixture() -> Self {
        Self::start(StatusCode::OK, FIXTURE).await
    }

    /// An address nothing listens on.
    pub async fn unreachable() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        Self {
            url: format!("http://127.0.0.1:{}/produtos", port),
            requests: Arc::new(Mutex::new(Vec::new())),
            handle: None,
        }
    }

    /// Query strings received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockSource {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A test client that sends requests through the application router.
pub struct TestClient {
    state: AppState,
    pub source: MockSource,
}

impl TestClient {
    /// Client backed by the fixture data.
    pub async fn new() -> Self {
        Self::with_source(MockSource::fixture().await)
    }

    pub fn with_source(source: MockSource) -> Self {
        Self::with_static_path(source, PathBuf::from("static"))
    }

    /// Client serving static files from `static_path`.
    pub fn with_static_path(source: MockSource, static_path: PathBuf) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 8501,
            source_url: source.url.clone(),
            static_path,
            request_timeout: Some(Duration::from_secs(5)),
        };

        let sales_source =
            SalesSource::from_config(&config).expect("Failed to create sales source");

        let state = AppState {
            config: Arc::new(config),
            manifest: JsManifest::default(),
            source: sales_source,
        };

        Self { state, source }
    }

    /// The production router: routes, static files and error pages.
    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }
}
