//! High-level operations.
//!
//! This module contains the implementation of the cubemx-cpp commands.

pub mod convert;
pub mod rewrite;
pub mod validate;

pub use convert::{convert, open_project, ConvertOptions};
pub use rewrite::{BackupOutcome, ReferenceRewriter, RewriteReport, Substitution};
pub use validate::{validate, ValidationReport};
