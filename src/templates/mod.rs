//! Page templates
//!
//! Templates are plain HTML files on disk using the tag syntax in
//! [`render`]. They are re-read on every render so edits show up
//! without a restart.

mod render;

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use render::{escape_html, Template};

/// Template errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no templates configured")]
    NoTemplates,

    #[error("failed to load template {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template syntax error: {0}")]
    Syntax(String),

    #[error("unknown template key: {0}")]
    UnknownKey(String),

    #[error("template key {0} has the wrong type")]
    TypeMismatch(String),

    #[error("failed to build template context: {0}")]
    Context(#[from] serde_json::Error),
}

/// The set of templates a page may be rendered with
#[derive(Debug, Clone)]
pub struct TemplateSet {
    paths: Vec<PathBuf>,
}

impl TemplateSet {
    /// Create a set from template file paths
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Configured template paths
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Pick one template path uniformly at random
    pub fn choose<R>(&self, rng: &mut R) -> Result<&Path, TemplateError>
    where
        R: Rng + ?Sized,
    {
        crate::images::pick_one(&self.paths, rng)
            .map(PathBuf::as_path)
            .map_err(|_| TemplateError::NoTemplates)
    }

    /// Load and parse a template file
    pub fn load(path: &Path) -> Result<Template, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Template::parse(path.display().to_string(), &source)
    }

    /// Render `context` with a randomly chosen template
    pub fn render_random<C, R>(&self, context: &C, rng: &mut R) -> Result<String, TemplateError>
    where
        C: Serialize,
        R: Rng + ?Sized,
    {
        let path = self.choose(rng)?;
        let template = Self::load(path)?;
        debug!("Rendering with template {}", template.name());
        template.render(&serde_json::to_value(context)?)
    }
}
