//! Manifest resolution
//!
//! Detects the schema generation of a package manifest and instantiates the
//! matching test model. Detection runs in fixed priority order: QTI 2.x
//! assessment test, QTI 1.2, QTI 2.x non-assessment item set; anything else
//! is an unsupported schema. String-backed manifests skip both 2.x branches
//! — with no file path there is nothing to resolve child documents against,
//! a deliberate limitation of the in-memory entry point.

use std::path::{Path, PathBuf};

use roxmltree::Document;

use crate::errors::{ImportError, Result};
use crate::models::source::Source;
use crate::models::v1::Assessment;
use crate::models::v2::{AssessmentTest, NonAssessmentTest};
use crate::xmlutil;

/// A package on disk: the directory tree holding one manifest and the
/// assessment files it references. Manifest file discovery stays with the
/// caller.
#[derive(Debug, Clone)]
pub struct Package {
    root: PathBuf,
}

impl Package {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a manifest at a path relative to the package root.
    pub fn manifest_at(&self, relative: impl AsRef<Path>) -> Result<Manifest> {
        Manifest::from_path(&self.root.join(relative.as_ref()), Some(&self.root))
    }
}

/// The test model produced by a manifest, schema generation fixed at
/// construction.
#[derive(Debug, Clone)]
pub enum Test {
    V1(Assessment),
    V2(AssessmentTest),
    V2NonAssessment(NonAssessmentTest),
}

/// The top-level descriptor of a package.
#[derive(Debug, Clone)]
pub struct Manifest {
    source: Source,
}

impl Manifest {
    pub fn from_path(path: &Path, package_root: Option<&Path>) -> Result<Self> {
        Ok(Self {
            source: Source::from_path(path, package_root)?,
        })
    }

    pub fn from_string(content: &str) -> Result<Self> {
        Ok(Self {
            source: Source::from_string(content)?,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Resolve this manifest to its test model. First recognized schema
    /// generation wins; none is `UnsupportedSchema`.
    pub fn assessment_test(&self) -> Result<Test> {
        if let Some(test) = self.qti_2_x_test()? {
            log::debug!("manifest resolved to a QTI 2.x assessment test");
            return Ok(test);
        }
        if let Some(test) = self.qti_1_test()? {
            log::debug!("manifest resolved to a QTI 1.2 assessment");
            return Ok(test);
        }
        if let Some(test) = self.qti_2_non_assessment_test()? {
            log::debug!("manifest resolved to a QTI 2.x non-assessment item set");
            return Ok(test);
        }
        Err(ImportError::UnsupportedSchema(
            "unsupported QTI version".into(),
        ))
    }

    fn qti_2_x_test(&self) -> Result<Option<Test>> {
        if self.source.is_from_string() {
            return Ok(None);
        }
        let doc = Document::parse(self.source.content())?;
        let root = doc.root_element();

        // the manifest may itself be the assessmentTest document
        if root_namespace(&doc).contains("ims_qtiasiv2p1") {
            let path = self.source.path().expect("path-backed source");
            let test = AssessmentTest::from_path(path, self.source.package_root())?;
            return Ok(Some(Test::V2(test)));
        }

        let href = match resource_href(root, "imsqti_test_xmlv2p1")? {
            Some(href) => Some(href),
            None => resource_href(root, "imsqti_test_xmlv2p2")?,
        };
        let Some(href) = href else {
            return Ok(None);
        };
        let Some(path) = self.source.remap_href(Some(&href))? else {
            return Ok(None);
        };
        let test = AssessmentTest::from_path(path.as_path(), self.source.package_root())?;
        Ok(Some(Test::V2(test)))
    }

    fn qti_1_test(&self) -> Result<Option<Test>> {
        let doc = Document::parse(self.source.content())?;
        let root = doc.root_element();

        // the document itself may be a QTI 1.2 assessment
        if root_namespace(&doc).contains("ims_qtiasiv1p2") {
            let assessment = if self.source.is_from_string() {
                Assessment::from_string(self.source.content())?
            } else {
                let path = self.source.path().expect("path-backed source");
                Assessment::from_path(path, self.source.package_root())?
            };
            return Ok(Some(Test::V1(assessment)));
        }

        let href = match resource_href(root, "imsqti_xmlv1p2")? {
            Some(href) => Some(href),
            None => resource_file_href(root, "imsqti_xmlv1p2")?,
        };
        let Some(href) = href else {
            return Ok(None);
        };
        let assessment = if self.source.is_from_string() {
            // an in-memory manifest carries its assessment in the same string
            Assessment::from_string(self.source.content())?
        } else {
            let Some(path) = self.source.remap_href(Some(&href))? else {
                return Ok(None);
            };
            Assessment::from_path(path.as_path(), self.source.package_root())?
        };
        Ok(Some(Test::V1(assessment)))
    }

    fn qti_2_non_assessment_test(&self) -> Result<Option<Test>> {
        if self.source.is_from_string() {
            return Ok(None);
        }
        let doc = Document::parse(self.source.content())?;
        let root = doc.root_element();
        let declared = xmlutil::descendants(root, "resource").into_iter().any(|r| {
            matches!(
                r.attribute("type"),
                Some("imsqti_item_xmlv2p1") | Some("imsqti_item_xmlv2p2")
            ) && r.attribute("href").is_some()
        });
        if !declared {
            return Ok(None);
        }
        let path = self.source.path().expect("path-backed source");
        let test = NonAssessmentTest::from_path(path, self.source.package_root())?;
        Ok(Some(Test::V2NonAssessment(test)))
    }
}

fn root_namespace<'a>(doc: &'a Document<'a>) -> &'a str {
    doc.root_element().tag_name().namespace().unwrap_or("")
}

/// The href of the unique resource with the given type; more than one such
/// resource is ambiguous.
fn resource_href(root: roxmltree::Node, resource_type: &str) -> Result<Option<String>> {
    let hrefs: Vec<&str> = xmlutil::descendants(root, "resource")
        .into_iter()
        .filter(|r| r.attribute("type") == Some(resource_type))
        .filter_map(|r| r.attribute("href"))
        .collect();
    if hrefs.len() > 1 {
        return Err(ImportError::Parse(format!(
            "too many resources of type {resource_type}"
        )));
    }
    Ok(hrefs.first().map(|h| h.to_string()))
}

/// Fallback: the href of the unique `file` child of resources with the
/// given type.
fn resource_file_href(root: roxmltree::Node, resource_type: &str) -> Result<Option<String>> {
    let hrefs: Vec<&str> = xmlutil::descendants(root, "resource")
        .into_iter()
        .filter(|r| r.attribute("type") == Some(resource_type))
        .flat_map(|r| xmlutil::descendants(r, "file"))
        .filter_map(|f| f.attribute("href"))
        .collect();
    if hrefs.len() > 1 {
        return Err(ImportError::Parse(format!(
            "too many files for resource type {resource_type}"
        )));
    }
    Ok(hrefs.first().map(|h| h.to_string()))
}
