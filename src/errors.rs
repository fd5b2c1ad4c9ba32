//! Error types for package import
//!
//! Defines the three failure kinds of the import pipeline. All of them are
//! fatal to the current parse; callers decide whether to skip the offending
//! item or abort the whole package.

use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Top-level import error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Structural ambiguity or violation discovered while querying markup,
    /// malformed XML, or a path-safety violation
    #[error("parse error: {0}")]
    Parse(String),

    /// Content that parses but violates a documented schema constraint
    #[error("specification violation: {0}")]
    SpecificationViolation(String),

    /// No recognized schema generation, or markup a variant deliberately
    /// declines to support
    #[error("unsupported schema: {0}")]
    UnsupportedSchema(String),
}

impl From<roxmltree::Error> for ImportError {
    fn from(err: roxmltree::Error) -> Self {
        ImportError::Parse(format!("invalid XML: {err}"))
    }
}
