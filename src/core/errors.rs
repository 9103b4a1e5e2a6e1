//! Error taxonomy for validation and rewriting.
//!
//! There are two propagation paths: fatal errors are returned as
//! [`ConvertError`], non-fatal problems are collected as warning
//! [`Diagnostic`]s in the operation reports.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Exit code for a required file missing during validation.
pub const EXIT_MISSING_FILE: i32 = 1;
/// Exit code for a failed consistency check during validation.
pub const EXIT_INCONSISTENT_STATE: i32 = 2;
/// Exit code for an I/O failure during the rewrite phase.
pub const EXIT_IO_FAILURE: i32 = 3;

/// A fatal error raised while validating or rewriting a generated project.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConvertError {
    /// A required file does not exist.
    #[error("{what} not found: {}", .path.display())]
    #[diagnostic(
        code(cubemx_cpp::validate::missing_file),
        help("Generate code with STM32CubeMX first, then run this tool from the project root")
    )]
    MissingFile { what: &'static str, path: PathBuf },

    /// A required file exists but its content is not what we support.
    #[error("{reason} in {}", .path.display())]
    #[diagnostic(code(cubemx_cpp::validate::inconsistent_state))]
    InconsistentState {
        reason: String,
        path: PathBuf,
        expected: Option<String>,
        found: Option<String>,
    },

    /// Reading, writing or copying failed during the rewrite phase.
    #[error("failed to {action} {}", .path.display())]
    #[diagnostic(
        code(cubemx_cpp::rewrite::io),
        help("Check file permissions and that no other process holds the file exclusively")
    )]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn missing_file(what: &'static str, path: impl Into<PathBuf>) -> Self {
        ConvertError::MissingFile {
            what,
            path: path.into(),
        }
    }

    pub fn inconsistent(reason: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ConvertError::InconsistentState {
            reason: reason.into(),
            path: path.into(),
            expected: None,
            found: None,
        }
    }

    /// An inconsistency where a value differs from what was expected.
    pub fn mismatch(
        reason: impl Into<String>,
        path: impl Into<PathBuf>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ConvertError::InconsistentState {
            reason: reason.into(),
            path: path.into(),
            expected: Some(expected.into()),
            found: Some(found.into()),
        }
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit code the driver should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::MissingFile { .. } => EXIT_MISSING_FILE,
            ConvertError::InconsistentState { .. } => EXIT_INCONSISTENT_STATE,
            ConvertError::Io { .. } => EXIT_IO_FAILURE,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConvertError::MissingFile { what, path } => {
                Diagnostic::error(format!("{} not found", what))
                    .with_location(path)
                    .with_suggestion(suggestions::GENERATE_CODE)
                    .with_suggestion(suggestions::PROJECT_DIR)
            }

            ConvertError::InconsistentState {
                reason,
                path,
                expected,
                found,
            } => {
                let mut diag = Diagnostic::error(reason.clone()).with_location(path);

                if let Some(expected) = expected {
                    diag = diag.with_context(format!("expected: {}", expected));
                }
                if let Some(found) = found {
                    diag = diag.with_context(format!("found: {}", found));
                }

                diag.with_suggestion(suggestions::REGENERATE)
            }

            ConvertError::Io {
                action,
                path,
                source,
            } => Diagnostic::error(format!("failed to {}", action))
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::CLOSE_GENERATOR),
        }
    }
}
