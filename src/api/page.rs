//! Gallery page endpoint
//!
//! GET / - Render random images into a random template

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, warn};

use super::AppState;

/// Build the page router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Render one gallery page
async fn index(State(state): State<AppState>) -> Response {
    // Lock is released before any work starts
    let mut rng = StdRng::from_rng(&mut *state.rng.lock());
    let gallery = state.gallery.clone();

    match tokio::task::spawn_blocking(move || gallery.render_page(&mut rng)).await {
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            let status = e.status();
            if status.is_server_error() {
                error!("Failed to render page: {}", e);
            } else {
                warn!("Page not available: {}", e);
            }
            (status, e.public_message()).into_response()
        }
        Err(e) => {
            error!("Page task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.").into_response()
        }
    }
}
