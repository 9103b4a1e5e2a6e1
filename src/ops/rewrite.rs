//! Rewriting C source references in the generator build file.
//!
//! The build file is streamed line by line into a scratch file next to it.
//! Candidate lines whose C source has a C++ counterpart on disk are
//! replaced; every other line is copied through byte for byte. The scratch
//! file is then copied over the original and removed.
//!
//! The generator keeps its build file open while it runs, so the original
//! is overwritten by copying rather than replaced by a rename.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::project::SCRATCH_SUFFIX;
use crate::core::{ConvertError, ProjectIdentity, SourceReference};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{copy_over, read_raw_line, remove_file_if_exists};

/// What happened to the C file a substitution superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BackupOutcome {
    /// Renamed to `<file>.c.bak`.
    Renamed { path: String },
    /// The rename failed; the C file is still in place.
    Failed { path: String, reason: String },
    /// No backup was attempted (dry run or backups disabled).
    Skipped,
}

/// One rewritten line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// 1-based line number in the build file.
    pub line: usize,
    /// Referenced C source, relative to the project root.
    pub original: String,
    /// C++ counterpart now referenced instead.
    pub replacement: String,
    pub backup: BackupOutcome,
}

/// Result of processing one build file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
    pub substitutions: Vec<Substitution>,
    pub warnings: Vec<Diagnostic>,
    pub lines_read: usize,
    pub dry_run: bool,
}

impl RewriteReport {
    fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic.message);
        self.warnings.push(diagnostic);
    }
}

/// Rewrites C source references to their C++ counterparts.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter {
    root: PathBuf,
    backup: bool,
    dry_run: bool,
}

impl ReferenceRewriter {
    /// Create a rewriter resolving source paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ReferenceRewriter {
            root: root.into(),
            backup: true,
            dry_run: false,
        }
    }

    /// Create a rewriter for a validated project.
    pub fn for_project(identity: &ProjectIdentity) -> Self {
        Self::new(identity.root())
    }

    /// Whether superseded C files are renamed to `.bak` (default: true).
    pub fn backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Report substitutions without touching any file (default: false).
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite `target` in place.
    ///
    /// The scratch file is removed whether or not the rewrite succeeds;
    /// failing to remove it is only a warning.
    pub fn process(&self, target: &Path) -> Result<RewriteReport, ConvertError> {
        let mut report = RewriteReport {
            dry_run: self.dry_run,
            ..RewriteReport::default()
        };

        if self.dry_run {
            self.transform(target, Path::new("<dry run>"), &mut io::sink(), &mut report)?;
            return Ok(report);
        }

        let scratch = scratch_path(target);
        let result = self.rewrite_via(target, &scratch, &mut report);

        if let Err(e) = remove_file_if_exists(&scratch) {
            let diagnostic = Diagnostic::warning(format!(
                "failed to delete temporary file {}",
                scratch.display()
            ))
            .with_location(&scratch)
            .with_context(e.to_string())
            .with_suggestion("Delete the file manually");
            report.warn(diagnostic);
        }

        result.map(|()| report)
    }

    fn rewrite_via(
        &self,
        target: &Path,
        scratch: &Path,
        report: &mut RewriteReport,
    ) -> Result<(), ConvertError> {
        {
            let file = File::create(scratch).map_err(|e| ConvertError::io("create", scratch, e))?;
            let mut writer = BufWriter::new(file);
            self.transform(target, scratch, &mut writer, report)?;
            writer
                .flush()
                .map_err(|e| ConvertError::io("write", scratch, e))?;
        }

        copy_over(scratch, target).map_err(|e| ConvertError::io("replace", target, e))?;
        tracing::info!(
            "updated {} ({} substitutions)",
            target.display(),
            report.substitutions.len()
        );
        Ok(())
    }

    /// Stream `target` into `writer`, applying substitutions.
    fn transform(
        &self,
        target: &Path,
        output_path: &Path,
        writer: &mut impl Write,
        report: &mut RewriteReport,
    ) -> Result<(), ConvertError> {
        let file = File::open(target).map_err(|e| ConvertError::io("open", target, e))?;
        let mut reader = BufReader::new(file);
        let write_err = |e: io::Error| ConvertError::io("write", output_path, e);

        while let Some(line) =
            read_raw_line(&mut reader).map_err(|e| ConvertError::io("read", target, e))?
        {
            report.lines_read += 1;

            match self.substitute(&line.body, report.lines_read, report) {
                Some(rendered) => {
                    writer.write_all(rendered.as_bytes()).map_err(write_err)?;
                    writer
                        .write_all(line.terminator.as_bytes())
                        .map_err(write_err)?;
                }
                None => writer.write_all(&line.raw).map_err(write_err)?,
            }
        }

        Ok(())
    }

    /// Rewrite one line if it references a C file with a C++ counterpart.
    fn substitute(
        &self,
        body: &str,
        line_number: usize,
        report: &mut RewriteReport,
    ) -> Option<String> {
        let reference = SourceReference::parse(body)?;
        let Some(replacement) = reference.resolve_counterpart(&self.root) else {
            tracing::debug!(
                "line {}: no C++ counterpart for {}",
                line_number,
                reference.relative_path
            );
            return None;
        };

        let backup = if self.backup && !self.dry_run {
            self.back_up(&reference, report)
        } else {
            BackupOutcome::Skipped
        };

        tracing::debug!(
            "line {}: {} -> {}",
            line_number,
            reference.relative_path,
            replacement
        );
        let rendered = reference.render(&replacement);
        report.substitutions.push(Substitution {
            line: line_number,
            original: reference.relative_path.to_string(),
            replacement,
            backup,
        });

        Some(rendered)
    }

    /// Rename the superseded C file to `<file>.c.bak`, replacing any old backup.
    ///
    /// A failed rename does not stop the substitution; the C file stays in
    /// place and a warning is recorded.
    fn back_up(&self, reference: &SourceReference<'_>, report: &mut RewriteReport) -> BackupOutcome {
        let from = self.root.join(reference.relative_path);
        let backup_path = reference.backup_path();
        let to = self.root.join(&backup_path);

        match fs::rename(&from, &to) {
            Ok(()) => BackupOutcome::Renamed { path: backup_path },
            Err(e) => {
                report.warn(
                    Diagnostic::warning(format!(
                        "failed to back up the original C file `{}`; it is left in place",
                        reference.relative_path
                    ))
                    .with_location(&from)
                    .with_context(e.to_string())
                    .with_suggestion(suggestions::MANUAL_BACKUP),
                );
                BackupOutcome::Failed {
                    path: reference.relative_path.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Path of the scratch file written next to `target`.
pub fn scratch_path(target: &Path) -> PathBuf {
    let mut path: OsString = target.as_os_str().to_owned();
    path.push(SCRATCH_SUFFIX);
    PathBuf::from(path)
}
