//! Directory scanning for image files

use std::path::Path;

use tracing::debug;

use super::ImageError;

/// Recognized image extensions (lowercase, without the dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Check if a file name has a recognized image extension (case-insensitive)
pub fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List image file names directly inside `dir`, sorted by name
///
/// Subdirectories are skipped, never traversed.
pub fn scan_images(dir: &Path) -> Result<Vec<String>, ImageError> {
    let read_err = |source: std::io::Error| ImageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        // Non UTF-8 names cannot be rendered into a page
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if is_image(&name) {
            names.push(name);
        }
    }
    names.sort();

    debug!("Found {} images in {}", names.len(), dir.display());
    Ok(names)
}
