//! Package-relative path resolution
//!
//! The single security boundary of the pipeline. Every relative reference in
//! a package (item hrefs, object data attributes, stimulus dependencies) is
//! joined onto its referencing file, normalized lexically, and checked
//! against the package root before anything is read from disk. `SafePath` is
//! the only type the rest of the crate reads files through.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{ImportError, Result};

/// A path proven (by construction) to lie within the package root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath(PathBuf);

impl SafePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.0)
            .map_err(|e| ImportError::Parse(format!("failed to read {}: {e}", self.0.display())))
    }
}

/// Lexically normalize a path: drop `.` segments and resolve `..` against
/// preceding normal segments without touching the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Resolve `href` against the directory of `base_file`, enforcing the
/// package-root boundary. With no root configured, any reference containing
/// a parent-directory segment is rejected outright.
pub fn resolve(href: &str, base_file: &Path, package_root: Option<&Path>) -> Result<SafePath> {
    let base_dir = base_file.parent().unwrap_or_else(|| Path::new(""));
    let joined = base_dir.join(href);
    match package_root {
        None => {
            if href.split('/').any(|seg| seg == "..") {
                return Err(ImportError::Parse(format!(
                    "potentially unsafe href '{href}'"
                )));
            }
            Ok(SafePath(clean(&joined)))
        }
        Some(root) => {
            let cleaned = clean(&joined);
            if !cleaned.starts_with(clean(root)) {
                return Err(ImportError::Parse(format!("unsafe href '{href}'")));
            }
            Ok(SafePath(cleaned))
        }
    }
}
