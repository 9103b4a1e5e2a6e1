//! C source references in the generator build file.
//!
//! The generator lists each source on its own line, relative to the project
//! root, as `${CMAKE_CURRENT_SOURCE_DIR}/../../<path>.c`. A line whose
//! trimmed content has that shape is a candidate for switching to a C++
//! counterpart.

use std::path::Path;

/// Path prefix the generator uses to point from `cmake/stm32cubemx/` back
/// to the project root.
pub const SOURCE_DIR_PREFIX: &str = "${CMAKE_CURRENT_SOURCE_DIR}/../../";

/// Extension of the sources we look for.
pub const C_EXTENSION: &str = ".c";

/// C++ extensions probed for a counterpart, highest priority first.
pub const CPP_EXTENSIONS: [&str; 3] = [".cpp", ".cxx", ".cc"];

/// Suffix appended to a superseded C source.
pub const BACKUP_SUFFIX: &str = ".bak";

/// One candidate line of the generator build file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceReference<'a> {
    /// Indentation before the prefix, kept verbatim.
    pub leading_whitespace: &'a str,
    /// Path after the prefix, ending in `.c`.
    pub relative_path: &'a str,
}

impl<'a> SourceReference<'a> {
    /// Recognize a candidate line.
    ///
    /// `line` must not include its terminator. Trailing whitespace is
    /// ignored for matching.
    pub fn parse(line: &'a str) -> Option<Self> {
        let content = line.trim_start();
        let leading_whitespace = &line[..line.len() - content.len()];
        let content = content.trim_end();

        let relative_path = content.strip_prefix(SOURCE_DIR_PREFIX)?;
        if !relative_path.ends_with(C_EXTENSION) {
            return None;
        }

        Some(SourceReference {
            leading_whitespace,
            relative_path,
        })
    }

    /// The referenced path with its `.c` extension swapped for `extension`.
    pub fn with_extension(&self, extension: &str) -> String {
        let stem = &self.relative_path[..self.relative_path.len() - C_EXTENSION.len()];
        format!("{}{}", stem, extension)
    }

    /// Path of the backup the superseded C file is renamed to.
    pub fn backup_path(&self) -> String {
        format!("{}{}", self.relative_path, BACKUP_SUFFIX)
    }

    /// Find the first C++ counterpart that exists under `root`.
    ///
    /// Extensions are probed in [`CPP_EXTENSIONS`] order and the first hit
    /// wins, so `.cpp` shadows `.cxx` which shadows `.cc`.
    pub fn resolve_counterpart(&self, root: &Path) -> Option<String> {
        CPP_EXTENSIONS.iter().find_map(|ext| {
            let candidate = self.with_extension(ext);
            let exists = root.join(&candidate).is_file();
            tracing::debug!("probe {} -> {}", candidate, exists);
            exists.then_some(candidate)
        })
    }

    /// Render the replacement line body (without terminator).
    pub fn render(&self, replacement_path: &str) -> String {
        format!(
            "{}{}{}",
            self.leading_whitespace, SOURCE_DIR_PREFIX, replacement_path
        )
    }
}
