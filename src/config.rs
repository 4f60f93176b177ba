//! Server configuration
//!
//! Sources are merged in order, later ones winning:
//! built-in defaults, a TOML file, `GALLERYD_*` environment variables,
//! then command line overrides.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "galleryd.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GALLERYD_";

/// Default number of images shown per page
pub const DEFAULT_IMAGES_PER_PAGE: usize = 3;

/// Where images live below the image directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One subdirectory per theme
    #[default]
    Themed,
    /// Images directly inside the image directory
    Flat,
}

/// Gallery server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Address to listen on
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Image root directory
    pub image_dir: PathBuf,
    /// Fixed theme. In the flat layout this is only a label.
    pub theme: Option<String>,
    pub layout: Layout,
    /// Identity label shown on every page
    pub host_name: String,
    /// Template files, one picked at random per request
    pub templates: Vec<PathBuf>,
    /// Root served under `/static`
    pub static_dir: PathBuf,
    pub images_per_page: usize,
    /// Seed for reproducible randomness; random if unset
    pub seed: Option<u64>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            image_dir: PathBuf::from("./static/img/"),
            theme: None,
            layout: Layout::Themed,
            host_name: "galleryd".to_string(),
            templates: vec![
                PathBuf::from("templates/page1.html"),
                PathBuf::from("templates/page2.html"),
            ],
            static_dir: PathBuf::from("./static"),
            images_per_page: DEFAULT_IMAGES_PER_PAGE,
            seed: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("image directory does not exist: {}", .0.display())]
    MissingImageDir(PathBuf),

    #[error("images_per_page must be at least 1")]
    InvalidCount,
}

/// Command line overrides; unset fields leave lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_per_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GalleryConfig {
    /// Build the layered figment
    ///
    /// An explicit `file` must exist; otherwise [`DEFAULT_CONFIG_FILE`]
    /// is used when present.
    pub fn figment(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Figment, ConfigError> {
        let file = match file {
            Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        Ok(Figment::from(Serialized::defaults(GalleryConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides)))
    }

    /// Load and validate the configuration
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(file, overrides)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.image_dir.is_dir() {
            return Err(ConfigError::MissingImageDir(self.image_dir.clone()));
        }
        if self.images_per_page == 0 {
            return Err(ConfigError::InvalidCount);
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
