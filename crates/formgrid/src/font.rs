//! Font resolution for field descriptors
//!
//! Fields may request a font family. Resolution happens once, inside
//! `FieldBuilder::build()`, through a [`FontLoader`]. The directory loader
//! reads font files synchronously; there is no retry or timeout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FontError;

/// File extensions searched by [`DirectoryFontLoader`], in order
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// A resolved font
#[derive(Clone, PartialEq)]
pub struct FontHandle {
    family: String,
    path: Option<PathBuf>,
    data: Option<Arc<[u8]>>,
}

impl FontHandle {
    /// A font provided by the toolkit; nothing was loaded
    #[must_use]
    pub fn system(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            path: None,
            data: None,
        }
    }

    /// A font loaded from a file
    #[must_use]
    pub fn loaded(family: impl Into<String>, path: PathBuf, data: Vec<u8>) -> Self {
        Self {
            family: family.into(),
            path: Some(path),
            data: Some(Arc::from(data)),
        }
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw font bytes, for registering the font with the renderer
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("bytes", &self.data.as_ref().map(|d| d.len()))
            .finish()
    }
}

/// Resolves a font family to a concrete font
pub trait FontLoader: fmt::Debug {
    /// Resolve `family`. May read from the file system.
    fn resolve_font(&self, family: &str) -> Result<FontHandle, FontError>;
}

/// Trusts the toolkit to know the family; performs no I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFontLoader;

impl FontLoader for SystemFontLoader {
    fn resolve_font(&self, family: &str) -> Result<FontHandle, FontError> {
        Ok(FontHandle::system(family))
    }
}

/// Loads `<family>.{ttf,otf,ttc}` from a directory
#[derive(Debug, Clone)]
pub struct DirectoryFontLoader {
    dir: PathBuf,
}

impl DirectoryFontLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the font file for `family`; file stems match case-insensitively
    fn locate(&self, family: &str) -> Result<PathBuf, FontError> {
        let wanted = family.to_lowercase();
        let entries = std::fs::read_dir(&self.dir).map_err(|source| FontError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                let stem_matches = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.to_lowercase() == wanted);
                stem_matches && extension_rank(path).is_some()
            })
            .collect();
        candidates.sort_by_key(|path| extension_rank(path));

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| FontError::NotFound {
                family: family.to_string(),
                dir: self.dir.clone(),
            })
    }
}

impl FontLoader for DirectoryFontLoader {
    fn resolve_font(&self, family: &str) -> Result<FontHandle, FontError> {
        let path = self.locate(family)?;
        let data = std::fs::read(&path).map_err(|source| FontError::Io {
            path: path.clone(),
            source,
        })?;
        validate_font_bytes(&path, &data)?;
        tracing::debug!(family, path = %path.display(), bytes = data.len(), "loaded font");
        Ok(FontHandle::loaded(family, path, data))
    }
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    FONT_EXTENSIONS.iter().position(|e| *e == ext)
}

/// Check the sfnt/collection magic number
fn validate_font_bytes(path: &Path, data: &[u8]) -> Result<(), FontError> {
    let magic = data.get(..4).ok_or_else(|| FontError::InvalidFormat {
        path: path.to_path_buf(),
        reason: format!("file too short ({} bytes)", data.len()),
    })?;

    match magic {
        [0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"ttcf" => Ok(()),
        other => Err(FontError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("unrecognized signature {other:02X?}"),
        }),
    }
}

/// Where fonts are looked up when no explicit loader is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontEnvironment {
    /// Fonts known to the toolkit
    #[default]
    System,
    /// Font files in the configured font directory
    Directory,
}

/// Per-field font settings, resolved once at build time
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub log_warnings: bool,
    /// Target name recorded with font warnings
    pub log_target: Option<String>,
    pub environment: FontEnvironment,
    pub font_dir: Option<PathBuf>,
    pub family: Option<String>,
    pub loader: Option<Rc<dyn FontLoader>>,
    resolved: Option<FontHandle>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            log_warnings: true,
            log_target: None,
            environment: FontEnvironment::System,
            font_dir: None,
            family: None,
            loader: None,
            resolved: None,
        }
    }
}

impl FontConfig {
    /// The font resolved by the last successful `resolve`
    #[must_use]
    pub fn resolved(&self) -> Option<&FontHandle> {
        self.resolved.as_ref()
    }

    /// The loader used for resolution: an explicit loader wins, then the
    /// environment decides.
    #[must_use]
    pub fn effective_loader(&self) -> Rc<dyn FontLoader> {
        if let Some(loader) = &self.loader {
            return Rc::clone(loader);
        }
        match (self.environment, &self.font_dir) {
            (FontEnvironment::Directory, Some(dir)) => Rc::new(DirectoryFontLoader::new(dir)),
            (FontEnvironment::Directory, None) => Rc::new(DirectoryFontLoader::new("fonts")),
            (FontEnvironment::System, _) => Rc::new(SystemFontLoader),
        }
    }

    /// Resolve the requested family, if any. `owner` names the field in logs.
    pub fn resolve(&mut self, owner: &str) -> Result<(), FontError> {
        let Some(family) = self.family.clone() else {
            return Ok(());
        };

        match self.effective_loader().resolve_font(&family) {
            Ok(handle) => {
                self.resolved = Some(handle);
                Ok(())
            }
            Err(err) => {
                if self.log_warnings {
                    let target = self.log_target.as_deref().unwrap_or(module_path!());
                    tracing::warn!(
                        field = owner,
                        log_target = target,
                        error = %err,
                        "font resolution failed"
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TTF_HEADER: [u8; 8] = [0x00, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x80];

    #[test]
    fn test_system_loader_never_fails() {
        let handle = SystemFontLoader.resolve_font("Inter").unwrap();
        assert_eq!(handle.family(), "Inter");
        assert!(handle.data().is_none());
    }

    #[test]
    fn test_directory_loader_finds_font() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Inter.ttf"), TTF_HEADER).unwrap();

        let loader = DirectoryFontLoader::new(dir.path());
        let handle = loader.resolve_font("inter").unwrap();
        assert_eq!(handle.data().map(<[u8]>::len), Some(8));
        assert!(handle.path().is_some());
    }

    #[test]
    fn test_directory_loader_prefers_ttf() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Mono.otf"), b"OTTO0000").unwrap();
        fs::write(dir.path().join("Mono.ttf"), TTF_HEADER).unwrap();

        let handle = DirectoryFontLoader::new(dir.path()).resolve_font("Mono").unwrap();
        assert_eq!(
            handle.path().and_then(|p| p.extension()).and_then(|e| e.to_str()),
            Some("ttf")
        );
    }

    #[test]
    fn test_directory_loader_missing_font() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryFontLoader::new(dir.path())
            .resolve_font("Nope")
            .unwrap_err();
        assert!(matches!(err, FontError::NotFound { .. }));
    }

    #[test]
    fn test_directory_loader_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Bad.ttf"), b"<html>").unwrap();
        let err = DirectoryFontLoader::new(dir.path())
            .resolve_font("Bad")
            .unwrap_err();
        assert!(matches!(err, FontError::InvalidFormat { .. }));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = DirectoryFontLoader::new("/definitely/not/here")
            .resolve_font("Inter")
            .unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn test_font_config_without_family_does_nothing() {
        let mut config = FontConfig {
            environment: FontEnvironment::Directory,
            font_dir: Some(PathBuf::from("/definitely/not/here")),
            ..FontConfig::default()
        };
        assert!(config.resolve("name").is_ok());
        assert!(config.resolved().is_none());
    }

    #[test]
    fn test_font_config_propagates_failure() {
        let dir = TempDir::new().unwrap();
        let mut config = FontConfig {
            environment: FontEnvironment::Directory,
            font_dir: Some(dir.path().to_path_buf()),
            family: Some("Missing".to_string()),
            log_warnings: false,
            ..FontConfig::default()
        };
        assert!(config.resolve("name").is_err());
        assert!(config.resolved().is_none());
    }
}
