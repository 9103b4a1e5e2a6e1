//! Parsing of `.ioc` manifest lines.
//!
//! The manifest is a flat list of `key=value` lines in Java properties
//! style. Only the handful of keys we validate are looked at, so this is a
//! line-level parser rather than a full properties reader.

/// Key holding the project name.
pub const KEY_PROJECT_NAME: &str = "ProjectManager.ProjectName";

/// Key holding the selected toolchain.
pub const KEY_TARGET_TOOLCHAIN: &str = "ProjectManager.TargetToolchain";

/// Key holding the generator version that last wrote the file.
pub const KEY_GENERATOR_VERSION: &str = "MxCube.Version";

/// The only toolchain whose output layout we rewrite.
pub const SUPPORTED_TOOLCHAIN: &str = "CMake";

/// A `key=value` manifest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IocEntry<'a> {
    /// Everything before the first `=`, trailing whitespace trimmed.
    pub key: &'a str,
    /// Everything after the first `=`, still escaped.
    raw_value: &'a str,
}

impl<'a> IocEntry<'a> {
    /// Split a line at its first `=`. Lines without one are not entries.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (key, raw_value) = line.split_once('=')?;
        Some(IocEntry {
            key: key.trim_end(),
            raw_value,
        })
    }

    /// The value with leading whitespace stripped and escapes resolved.
    pub fn value(&self) -> String {
        unescape_value(self.raw_value.trim_start())
    }
}

/// Resolve manifest escapes.
///
/// Replacements are applied one after another in a fixed order:
/// `\ `, `\=`, `\:`, then `\\`.
pub fn unescape_value(value: &str) -> String {
    value
        .replace("\\ ", " ")
        .replace("\\=", "=")
        .replace("\\:", ":")
        .replace("\\\\", "\\")
}
