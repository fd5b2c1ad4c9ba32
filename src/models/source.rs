//! Document provenance
//!
//! `Source` records where a document came from — a file under a package
//! root, or an in-memory string — together with its math-normalized text.
//! Relative references resolve through it, and string-backed sources
//! resolve nothing (the documented limitation for 2.x content).

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ImportError, Result};
use crate::math;
use crate::paths::{self, SafePath};
use crate::sanitize;

#[derive(Debug, Clone)]
pub struct Source {
    path: Option<PathBuf>,
    package_root: Option<PathBuf>,
    content: String,
    from_string: bool,
}

impl Source {
    /// Load a document from disk. With no explicit package root the file's
    /// own directory becomes the boundary.
    pub fn from_path(path: &Path, package_root: Option<&Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ImportError::Parse(format!("failed to read {}: {e}", path.display())))?;
        let root = package_root
            .map(Path::to_path_buf)
            .or_else(|| path.parent().map(Path::to_path_buf));
        Ok(Self {
            path: Some(path.to_path_buf()),
            package_root: root.map(|r| paths::clean(&r)),
            content: math::normalize_math(&raw)?,
            from_string: false,
        })
    }

    /// Wrap an in-memory document.
    pub fn from_string(content: &str) -> Result<Self> {
        Ok(Self {
            path: None,
            package_root: None,
            content: math::normalize_math(content)?,
            from_string: true,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn package_root(&self) -> Option<&Path> {
        self.package_root.as_deref()
    }

    pub fn is_from_string(&self) -> bool {
        self.from_string
    }

    /// The file stem of the backing file, used as a title fallback.
    pub fn file_stem(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Resolve a relative reference against this document, bounded by the
    /// package root. Returns `None` when there is no reference or no file
    /// path to resolve against; unsafe references are parse errors.
    pub fn remap_href(&self, href: Option<&str>) -> Result<Option<SafePath>> {
        let Some(href) = href else {
            return Ok(None);
        };
        if self.from_string {
            return Ok(None);
        }
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        paths::resolve(href, path, self.package_root.as_deref()).map(Some)
    }

    /// Sanitize a markup fragment in the context of this document, with
    /// object-reference import enabled.
    pub fn sanitize(&self, html: &str) -> Result<String> {
        sanitize::sanitize_fragment(html, self, true)
    }
}
