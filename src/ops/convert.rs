//! Driver-facing operations.
//!
//! Validation always runs first; the rewrite only accepts an identity that
//! validation has frozen.

use std::path::Path;

use crate::core::{ConvertError, ProjectIdentity};
use crate::ops::rewrite::{ReferenceRewriter, RewriteReport};
use crate::ops::validate::{validate, ValidationReport};
use crate::util::Config;

/// Options for the rewrite phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Rename superseded C files to `.bak`.
    pub backup: bool,
    /// Compute substitutions without writing anything.
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            backup: true,
            dry_run: false,
        }
    }
}

impl ConvertOptions {
    /// Options as configured in config files.
    pub fn from_config(config: &Config) -> Self {
        ConvertOptions {
            backup: config.backup(),
            dry_run: config.dry_run(),
        }
    }
}

/// Validate the generated project under `root`.
pub fn open_project(root: &Path) -> Result<(ProjectIdentity, ValidationReport), ConvertError> {
    let mut identity = ProjectIdentity::new(root);
    let report = validate(&mut identity)?;
    Ok((identity, report))
}

/// Rewrite the generator build file of a validated project.
pub fn convert(
    identity: &ProjectIdentity,
    options: &ConvertOptions,
) -> Result<RewriteReport, ConvertError> {
    if !identity.is_initialized() {
        return Err(ConvertError::inconsistent(
            "project has not been validated",
            identity.root(),
        ));
    }

    ReferenceRewriter::for_project(identity)
        .backup(options.backup)
        .dry_run(options.dry_run)
        .process(&identity.generator_build_file())
}
