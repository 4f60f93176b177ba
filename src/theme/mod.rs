//! Theme resolution
//!
//! A theme is a subdirectory of the image root. It groups a themed set
//! of images and doubles as the label shown on the page. When no theme
//! is configured, one is chosen at random for every request.

use std::path::{Component, Path, PathBuf};

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::images::pick_one;

/// A theme directory selected for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    /// Directory holding the theme's images
    pub path: PathBuf,
    /// Theme name (the directory name)
    pub name: String,
}

/// Theme resolution errors
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme not found: {0}")]
    NotFound(String),

    #[error("no themes available in {}", .0.display())]
    NoThemes(PathBuf),

    #[error("failed to list themes in {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A theme name must be a single plain path component
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// List the names of the immediate subdirectories of `base`, sorted
pub fn list_themes(base: &Path) -> Result<Vec<String>, ThemeError> {
    let read_err = |source: std::io::Error| ThemeError::ReadDir {
        path: base.to_path_buf(),
        source,
    };

    let mut themes = Vec::new();
    for entry in std::fs::read_dir(base).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            themes.push(name.to_string());
        }
    }
    themes.sort();
    Ok(themes)
}

/// Resolve the image directory for a request
///
/// With `theme` set, `<base>/<theme>` must exist. Without it, one
/// subdirectory of `base` is picked uniformly at random.
pub fn resolve_theme<R>(
    base: &Path,
    theme: Option<&str>,
    rng: &mut R,
) -> Result<ResolvedTheme, ThemeError>
where
    R: Rng + ?Sized,
{
    if let Some(name) = theme {
        if !is_plain_name(name) {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        let path = base.join(name);
        if !path.exists() {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        return Ok(ResolvedTheme {
            path,
            name: name.to_string(),
        });
    }

    let themes = list_themes(base)?;
    let name = pick_one(&themes, rng)
        .map_err(|_| ThemeError::NoThemes(base.to_path_buf()))?
        .clone();
    debug!("Picked theme {} out of {}", name, themes.len());

    Ok(ResolvedTheme {
        path: base.join(&name),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn themed_root(themes: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for theme in themes {
            std::fs::create_dir(dir.path().join(theme)).unwrap();
        }
        // Loose files at the root are not themes
        std::fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        dir
    }

    #[test]
    fn test_named_theme() {
        let root = themed_root(&["cats", "dogs"]);
        let mut rng = StdRng::seed_from_u64(0);

        let resolved = resolve_theme(root.path(), Some("dogs"), &mut rng).unwrap();
        assert_eq!(resolved.path, root.path().join("dogs"));
        assert_eq!(resolved.name, "dogs");
    }

    #[test]
    fn test_named_theme_missing() {
        let root = themed_root(&["cats"]);
        let mut rng = StdRng::seed_from_u64(0);

        let err = resolve_theme(root.path(), Some("birds"), &mut rng).unwrap_err();
        assert!(matches!(err, ThemeError::NotFound(ref name) if name == "birds"));
        assert_eq!(err.to_string(), "theme not found: birds");
    }

    #[test]
    fn test_named_theme_cannot_escape_root() {
        let root = themed_root(&["cats"]);
        let mut rng = StdRng::seed_from_u64(0);

        for name in ["..", "../cats", "cats/..", "/etc", "", "."] {
            let err = resolve_theme(&root.path().join("cats"), Some(name), &mut rng).unwrap_err();
            assert!(matches!(err, ThemeError::NotFound(_)), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_random_theme_is_child_of_base() {
        let root = themed_root(&["cats", "dogs", "fish"]);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..30 {
            let resolved = resolve_theme(root.path(), None, &mut rng).unwrap();
            assert_eq!(resolved.path.parent(), Some(root.path()));
            assert!(resolved.path.is_dir());
            assert!(["cats", "dogs", "fish"].contains(&resolved.name.as_str()));
        }
    }

    #[test]
    fn test_no_themes() {
        let root = themed_root(&[]);
        let mut rng = StdRng::seed_from_u64(0);

        let err = resolve_theme(root.path(), None, &mut rng).unwrap_err();
        assert!(matches!(err, ThemeError::NoThemes(_)));
        assert!(err.to_string().starts_with("no themes available in"));
    }

    #[test]
    fn test_unreadable_root() {
        let root = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let err = resolve_theme(&root.path().join("missing"), None, &mut rng).unwrap_err();
        assert!(matches!(err, ThemeError::ReadDir { .. }));
    }

    #[test]
    fn test_list_themes_sorted() {
        let root = themed_root(&["zebra", "apple", "mango"]);
        assert_eq!(list_themes(root.path()).unwrap(), vec!["apple", "mango", "zebra"]);
    }
}
