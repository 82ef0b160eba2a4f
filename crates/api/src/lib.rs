//! HTTP transport for the cascade engine.

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod responses;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use candle_core::Device;
use chrono::{DateTime, Utc};
use dermascan_cascade::CascadeEngine;
use dermascan_core::config::DermascanConfig;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Model readiness as seen by the transport layer. Models load in the
/// background after the listener is up; prediction returns 503 until
/// the engine is ready.
#[derive(Clone)]
pub enum EngineStatus {
    Loading,
    Ready {
        engine: Arc<CascadeEngine>,
        device: Device,
    },
    Failed(String),
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<EngineStatus>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: Arc::new(RwLock::new(EngineStatus::Loading)),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_router(state: AppState, max_image_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))
        .route("/classes", get(handlers::classes))
        .route("/predict", post(handlers::predict))
        .layer(DefaultBodyLimit::max(max_image_bytes))
        .layer(cors)
        .with_state(state)
}

/// Bind the listener, kick off model loading in the background, and
/// serve until the process is stopped.
pub async fn serve(config: DermascanConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = AppState::new();
    let app = build_router(state.clone(), config.max_image_bytes);

    let load_config = config.clone();
    let status = state.engine.clone();
    tokio::spawn(async move {
        let loaded =
            tokio::task::spawn_blocking(move || bootstrap::load_engine(&load_config)).await;
        let mut slot = status.write().await;
        *slot = match loaded {
            Ok(Ok((engine, device))) => {
                info!("Cascade engine ready");
                EngineStatus::Ready { engine, device }
            }
            Ok(Err(e)) => {
                error!("Model loading failed: {e}");
                EngineStatus::Failed(e.to_string())
            }
            Err(e) => {
                error!("Model loading task panicked: {e}");
                EngineStatus::Failed(e.to_string())
            }
        };
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "dermascan API listening");
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
