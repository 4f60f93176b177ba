//! Common test utilities - GalleryTest harness for end-to-end testing

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use galleryd::{GalleryConfig, Server};
use reqwest::Client;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Bytes of a tiny PNG header, enough to look like an image
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-body";

/// An on-disk image tree plus copies of the shipped templates
pub struct ImageTree {
    dir: TempDir,
}

impl ImageTree {
    /// Create an empty tree with `img/` and `static/` roots
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        std::fs::create_dir_all(dir.path().join("img"))?;
        std::fs::create_dir_all(dir.path().join("static"))?;
        Ok(Self { dir })
    }

    /// Image root directory
    pub fn image_dir(&self) -> PathBuf {
        self.dir.path().join("img")
    }

    /// Static files root
    pub fn static_dir(&self) -> PathBuf {
        self.dir.path().join("static")
    }

    /// Add images to a theme folder, creating it if needed
    pub fn theme(&self, theme: &str, images: &[&str]) -> Result<&Self> {
        let dir = self.image_dir().join(theme);
        std::fs::create_dir_all(&dir)?;
        for name in images {
            std::fs::write(dir.join(name), PNG_BYTES)?;
        }
        Ok(self)
    }

    /// Write a file relative to the tree root
    pub fn file(&self, rel: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Paths of the templates shipped with the crate
    pub fn shipped_templates() -> Vec<PathBuf> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        vec![root.join("page1.html"), root.join("page2.html")]
    }

    /// Config pointing at this tree with a fixed seed
    pub fn config(&self) -> GalleryConfig {
        GalleryConfig {
            image_dir: self.image_dir(),
            static_dir: self.static_dir(),
            templates: Self::shipped_templates(),
            host_name: "test-host".to_string(),
            seed: Some(1234),
            ..Default::default()
        }
    }
}

/// Test harness that spawns a real galleryd server on a random port
pub struct GalleryTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl GalleryTest {
    /// Start a server with the given configuration (bind address is replaced)
    pub async fn start(mut config: GalleryConfig) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        config.bind = addr.ip();
        config.port = addr.port();

        let server = Arc::new(Server::new(config));
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// GET a path and return status and body text
    pub async fn get_text(&self, path: &str) -> Result<(u16, String)> {
        let resp = self.get(path).await?;
        let status = resp.status().as_u16();
        Ok((status, resp.text().await?))
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }
}

impl Drop for GalleryTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}

/// Count embedded images in a rendered page
pub fn count_data_uris(body: &str) -> usize {
    body.matches("data:image/").count()
}
