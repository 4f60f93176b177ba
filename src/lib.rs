//! galleryd - random image gallery server daemon
//!
//! Serves pages showing a random selection of images, optionally grouped
//! into themes, inlined as base64 data URIs.

pub mod api;
pub mod config;
pub mod gallery;
pub mod images;
pub mod templates;
pub mod theme;

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub use config::{ConfigOverrides, GalleryConfig, Layout};
pub use gallery::{Gallery, PageContext, PageError};

/// The galleryd server instance
pub struct Server {
    config: GalleryConfig,
    state: api::AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: GalleryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let state = api::AppState::new(Gallery::new(&config), rng);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            state,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.state.clone(), &self.config.static_dir)
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;
        info!("galleryd listening on {}", local_addr);
        info!(
            "Serving images from {} ({:?} layout)",
            self.config.image_dir.display(),
            self.config.layout
        );

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("galleryd shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr()
    }

    /// Get the active configuration
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }
}
