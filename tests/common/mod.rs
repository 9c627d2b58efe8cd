#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use datasource_api::config::AppConfig;
use datasource_api::database::{DataSourceStore, DatabaseError, MemoryDataSourceStore, NewDataSource};
use datasource_api::{app, AppState};

pub const CREATE_PATH: &str = "/api/datasource/create";

/// The sqlx error a dropped Postgres connection produces
pub fn storage_error(message: &str) -> sqlx::Error {
    sqlx::Error::Io(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message.to_string()))
}

/// Store whose every call fails the way an unreachable database does
pub struct FailingStore {
    pub message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl DataSourceStore for FailingStore {
    async fn insert(&self, _record: NewDataSource) -> Result<i64, DatabaseError> {
        Err(storage_error(&self.message).into())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(storage_error(&self.message).into())
    }
}

/// Router over a fresh memory store; the store is returned for inspection
pub fn memory_app(config: AppConfig) -> (Router, Arc<MemoryDataSourceStore>) {
    let store = Arc::new(MemoryDataSourceStore::new());
    let router = app(AppState::new(store.clone(), config));
    (router, store)
}

pub fn failing_app(message: &str) -> Router {
    app(AppState::new(Arc::new(FailingStore::new(message)), AppConfig::development()))
}

pub fn strict_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.api.strict_decoding = true;
    config
}

/// Send one request through the router and decode the JSON envelope
pub async fn send(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| {
            format!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
        })?
    };
    Ok((status, body))
}

pub async fn post_create(router: &Router, body: impl Into<Body>) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(CREATE_PATH)
        .header("content-type", "application/json")
        .body(body.into())?;
    send(router, request).await
}

pub async fn get(router: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty())?;
    send(router, request).await
}

/// A live server on an unused port, backed by a memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryDataSourceStore>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.api.port = port;
        let (router, store) = memory_app(config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self { port, base_url, store };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() <= deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}
