//! Image discovery, encoding and sampling
//!
//! Provides:
//! - Non-recursive directory scanning for image files
//! - Base64 data URI encoding for inline `<img>` sources
//! - Random selection of distinct images

mod encoder;
mod sampler;
mod scanner;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use encoder::{encode_data_uri, mime_type_for};
pub use sampler::{pick_distinct, pick_one};
pub use scanner::{is_image, scan_images, IMAGE_EXTENSIONS};

/// An image ready to be embedded in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// File name inside its directory
    pub name: String,
    /// `data:` URI with the base64 encoded file content
    pub src: String,
}

/// Image pipeline errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot pick from an empty set")]
    EmptyPool,

    #[error("requested {requested} distinct images but only {available} available")]
    NotEnoughImages { requested: usize, available: usize },
}

/// Load the given image names from `dir` as encoded records, preserving order
pub fn load_records<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<Vec<ImageRecord>, ImageError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            Ok(ImageRecord {
                name: name.to_string(),
                src: encode_data_uri(&dir.join(name))?,
            })
        })
        .collect()
}
