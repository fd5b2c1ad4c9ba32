//! Stimulus documents (QTI 2.x)
//!
//! Shared passages attached to items through manifest dependencies. The
//! body is the sanitized content of the referenced document.

use std::path::{Path, PathBuf};

use roxmltree::Document;

use crate::errors::Result;
use crate::models::source::Source;
use crate::paths::SafePath;
use crate::sanitize;
use crate::xmlutil;

#[derive(Debug, Clone)]
pub struct Stimulus {
    path: PathBuf,
    title: String,
    body: String,
}

impl Stimulus {
    pub(crate) fn from_path(path: &SafePath, package_root: Option<&Path>) -> Result<Self> {
        let source = Source::from_path(path.as_path(), package_root)?;
        let doc = Document::parse(source.content())?;
        let root = doc.root_element();
        let title = xmlutil::descendant(root, "title")
            .map(|n| xmlutil::collect_text(n).trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| source.file_stem())
            .unwrap_or_default();
        let body_node = xmlutil::descendant(root, "body").unwrap_or(root);
        let body = sanitize::sanitize_children(body_node, &source, true)?;
        Ok(Self {
            path: path.as_path().to_path_buf(),
            title,
            body,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
