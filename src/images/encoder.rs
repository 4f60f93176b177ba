//! Base64 data URI encoding
//!
//! Images are inlined into the page as `data:<mime>;base64,<payload>`,
//! so no second request is needed to fetch them.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::ImageError;

/// Media type for an image path, by extension
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Read a file and encode it as a base64 data URI
pub fn encode_data_uri(path: &Path) -> Result<String, ImageError> {
    let data = std::fs::read(path).map_err(|source| ImageError::ReadImage {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(format!(
        "data:{};base64,{}",
        mime_type_for(path),
        BASE64.encode(&data)
    ))
}
