//! HTTP API module - gallery page, static files and health

mod page;

use std::path::Path;
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Json, Router};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::gallery::Gallery;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gallery: Arc<Gallery>,
    /// Root randomness source; each request derives its own generator
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(gallery: Gallery, rng: StdRng) -> Self {
        Self {
            gallery: Arc::new(gallery),
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

/// Build the API router
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(page::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}
