//! Page assembly
//!
//! Resolves the image directory, samples and encodes images, and renders
//! them with a random template. Everything here is synchronous; the HTTP
//! layer runs it on the blocking pool.

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{GalleryConfig, Layout};
use crate::images::{self, ImageError, ImageRecord};
use crate::templates::{TemplateError, TemplateSet};
use crate::theme::{self, ThemeError};

/// Everything a template can see
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub host_name: String,
    pub images: Vec<ImageRecord>,
    pub theme: String,
    pub image_count: usize,
}

impl PageContext {
    pub fn new(host_name: impl Into<String>, images: Vec<ImageRecord>, theme: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            image_count: images.len(),
            images,
            theme: theme.into(),
        }
    }
}

/// Reasons a page could not be produced
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("no images found in {}", .0.display())]
    NoImages(PathBuf),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl PageError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Theme(ThemeError::NotFound(_)) | PageError::NoImages(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to show to clients
    pub fn public_message(&self) -> &'static str {
        match self {
            PageError::Theme(ThemeError::NotFound(_)) => "Theme not found.",
            PageError::Theme(_) => "Could not load the image theme.",
            PageError::NoImages(_) => "No images found in the folder.",
            PageError::Image(_) => "Could not load images.",
            PageError::Template(TemplateError::Load { .. } | TemplateError::NoTemplates) => {
                "Could not load the template."
            }
            PageError::Template(_) => "Could not render the template.",
        }
    }
}

/// Produces gallery pages from a directory tree
#[derive(Debug, Clone)]
pub struct Gallery {
    image_dir: PathBuf,
    theme: Option<String>,
    layout: Layout,
    host_name: String,
    images_per_page: usize,
    templates: TemplateSet,
}

impl Gallery {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            theme: config.theme.clone(),
            layout: config.layout,
            host_name: config.host_name.clone(),
            images_per_page: config.images_per_page,
            templates: TemplateSet::new(config.templates.clone()),
        }
    }

    /// Directory to scan and the theme label to show
    fn source<R>(&self, rng: &mut R) -> Result<(PathBuf, String), PageError>
    where
        R: Rng + ?Sized,
    {
        match self.layout {
            Layout::Flat => Ok((
                self.image_dir.clone(),
                self.theme.clone().unwrap_or_default(),
            )),
            Layout::Themed => {
                let resolved = theme::resolve_theme(&self.image_dir, self.theme.as_deref(), rng)?;
                Ok((resolved.path, resolved.name))
            }
        }
    }

    /// Select and encode the images for one page
    pub fn select_images<R>(&self, dir: &Path, rng: &mut R) -> Result<Vec<ImageRecord>, PageError>
    where
        R: Rng + ?Sized,
    {
        let names = images::scan_images(dir)?;
        if names.is_empty() {
            return Err(PageError::NoImages(dir.to_path_buf()));
        }

        let count = self.images_per_page.min(names.len());
        let chosen = images::pick_distinct(&names, count, |name| name.clone(), rng)?;
        debug!("Selected {:?} from {}", chosen, dir.display());

        Ok(images::load_records(dir, &chosen)?)
    }

    /// Build the template context for one request
    pub fn build_context<R>(&self, rng: &mut R) -> Result<PageContext, PageError>
    where
        R: Rng + ?Sized,
    {
        let (dir, theme) = self.source(rng)?;
        let images = self.select_images(&dir, rng)?;
        Ok(PageContext::new(self.host_name.clone(), images, theme))
    }

    /// Render a complete page
    pub fn render_page<R>(&self, rng: &mut R) -> Result<String, PageError>
    where
        R: Rng + ?Sized,
    {
        let context = self.build_context(rng)?;
        let html = self.templates.render_random(&context, rng)?;
        info!(
            "Rendered page with {} images (theme {:?})",
            context.image_count, context.theme
        );
        Ok(html)
    }
}
