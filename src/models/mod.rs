//! In-memory model families
//!
//! `manifest` detects the schema generation and hands out the matching test
//! model; `v1`/`v2` hold the per-generation item and test models; the
//! normalized output surface (interactions, stem items, scoring data) lives
//! in `interaction` and is shared by both families.

pub mod interaction;
pub mod manifest;
pub mod source;
pub mod v1;
pub mod v2;
