//! QTI assessment package import
//!
//! Parses IMS QTI packages — a manifest plus QTI 1.2 or 2.x item/test XML —
//! into one version-independent model: test metadata, ordered items,
//! classified interactions and normalized scoring data. Two incompatible
//! schema generations are detected from the manifest and handled by
//! separate model families; every embedded fragment is sanitized and every
//! file reference is resolved inside the package boundary before anything
//! is read.

pub mod errors;
pub mod math;
pub mod models;
pub mod paths;
pub mod sanitize;
pub(crate) mod xmlutil;

// Re-export the commonly used surface
pub use errors::{ImportError, Result};
pub use models::interaction::{
    AnswerChoice, Interaction, InteractionKind, ResponseType, ScoringData, StemItem,
};
pub use models::manifest::{Manifest, Package, Test};
pub use paths::SafePath;
