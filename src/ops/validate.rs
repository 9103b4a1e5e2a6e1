//! Project validation.
//!
//! Confirms that a directory holds a generated project we know how to
//! convert before any file is touched. Each step is a gate: the first
//! failure aborts the whole sequence.
//!
//! 1. `CMakeLists.txt` must exist.
//! 2. The project name is read from its `set(CMAKE_PROJECT_NAME ...)` line.
//! 3. `{name}.ioc` must exist.
//! 4. The manifest must agree on the project name, use the CMake toolchain
//!    and come from a supported generator version.
//! 5. `cmake/stm32cubemx/CMakeLists.txt` must exist.

use std::path::Path;

use semver::Version;
use serde::Serialize;

use crate::core::ioc::{
    IocEntry, KEY_GENERATOR_VERSION, KEY_PROJECT_NAME, KEY_TARGET_TOOLCHAIN, SUPPORTED_TOOLCHAIN,
};
use crate::core::project::{MAXIMUM_TESTED_VERSION, MINIMUM_SUPPORTED_VERSION};
use crate::core::{ConvertError, ProjectIdentity};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::read_lines;

/// Literal prefix of the line declaring the project name.
const PROJECT_NAME_PREFIX: &str = "set(CMAKE_PROJECT_NAME ";

/// Warnings gathered while validating a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter()
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic.message);
        self.warnings.push(diagnostic);
    }
}

/// Validate the project and freeze `identity`.
///
/// Calling this on an already initialized identity does nothing and
/// returns an empty report. On failure only the project name may have
/// changed; the generator version is committed last.
pub fn validate(identity: &mut ProjectIdentity) -> Result<ValidationReport, ConvertError> {
    if identity.is_initialized() {
        return Ok(ValidationReport::default());
    }

    let mut report = ValidationReport::default();

    let main_build_file = identity.main_build_file();
    if !main_build_file.is_file() {
        return Err(ConvertError::missing_file("main build file", main_build_file));
    }

    match find_project_name(&main_build_file)? {
        Some(name) => {
            tracing::debug!("project name from {}: {}", main_build_file.display(), name);
            identity.set_name(name);
        }
        None => report.warn(
            Diagnostic::warning("CMAKE_PROJECT_NAME not found in CMakeLists.txt")
                .with_location(&main_build_file)
                .with_context(format!("using default project name `{}`", identity.name()))
                .with_suggestion(
                    "Check whether the file was created by a newer version of STM32CubeMX",
                ),
        ),
    }

    let manifest_path = identity.manifest_path().to_path_buf();
    if !manifest_path.is_file() {
        return Err(ConvertError::missing_file("manifest", manifest_path));
    }

    let version = check_manifest(&manifest_path, identity.name(), &mut report)?;

    let generator_build_file = identity.generator_build_file();
    if !generator_build_file.is_file() {
        return Err(ConvertError::missing_file(
            "generator build file",
            generator_build_file,
        ));
    }

    tracing::info!(
        "validated project `{}` (STM32CubeMX {})",
        identity.name(),
        version
    );
    identity.finish(version);

    Ok(report)
}

/// Scan the main build file for the first usable project name declaration.
fn find_project_name(path: &Path) -> Result<Option<String>, ConvertError> {
    let lines = read_lines(path).map_err(|e| ConvertError::io("read", path, e))?;

    for line in lines {
        let line = line.map_err(|e| ConvertError::io("read", path, e))?;
        if let Some(name) = parse_project_name(&line) {
            return Ok(Some(name.to_string()));
        }
    }

    Ok(None)
}

/// Extract the name from a `set(CMAKE_PROJECT_NAME <name>)` line.
fn parse_project_name(line: &str) -> Option<&str> {
    if !line.starts_with(PROJECT_NAME_PREFIX) {
        return None;
    }

    let start = line.find(' ')? + 1;
    let end = start + line[start..].find(')')?;
    let name = line[start..end].trim();

    // An empty name is skipped rather than committed, so the directory
    // name stays in effect and the missing-name warning is reported.
    (!name.is_empty()).then_some(name)
}

/// Check the three required manifest keys, returning the generator version.
fn check_manifest(
    path: &Path,
    project_name: &str,
    report: &mut ValidationReport,
) -> Result<Version, ConvertError> {
    let lines = read_lines(path).map_err(|e| ConvertError::io("read", path, e))?;

    let mut name_confirmed = false;
    let mut toolchain_confirmed = false;
    let mut version: Option<Version> = None;

    for line in lines {
        let line = line.map_err(|e| ConvertError::io("read", path, e))?;
        let Some(entry) = IocEntry::parse(&line) else {
            continue;
        };

        match entry.key {
            KEY_PROJECT_NAME if !name_confirmed => {
                let value = entry.value();
                if value != project_name {
                    return Err(ConvertError::mismatch(
                        "project name mismatch",
                        path,
                        project_name,
                        value,
                    ));
                }
                name_confirmed = true;
            }
            KEY_TARGET_TOOLCHAIN if !toolchain_confirmed => {
                let value = entry.value();
                if value != SUPPORTED_TOOLCHAIN {
                    return Err(ConvertError::mismatch(
                        "unsupported toolchain",
                        path,
                        SUPPORTED_TOOLCHAIN,
                        value,
                    ));
                }
                toolchain_confirmed = true;
            }
            KEY_GENERATOR_VERSION if version.is_none() => {
                let parsed = check_version(path, &entry.value(), report)?;
                version = Some(parsed);
            }
            _ => continue,
        }

        if name_confirmed && toolchain_confirmed && version.is_some() {
            break;
        }
    }

    if !name_confirmed {
        return Err(key_not_found(KEY_PROJECT_NAME, path));
    }
    if !toolchain_confirmed {
        return Err(key_not_found(KEY_TARGET_TOOLCHAIN, path));
    }
    version.ok_or_else(|| key_not_found(KEY_GENERATOR_VERSION, path))
}

fn check_version(
    path: &Path,
    value: &str,
    report: &mut ValidationReport,
) -> Result<Version, ConvertError> {
    let version = parse_generator_version(value).ok_or_else(|| {
        ConvertError::mismatch("bad version format", path, "MAJOR.MINOR.PATCH", value)
    })?;

    if version < MINIMUM_SUPPORTED_VERSION {
        return Err(ConvertError::mismatch(
            "unsupported generator version",
            path,
            format!(">= {}", MINIMUM_SUPPORTED_VERSION),
            version.to_string(),
        ));
    }

    if version > MAXIMUM_TESTED_VERSION {
        report.warn(
            Diagnostic::warning(format!(
                "STM32CubeMX {} is newer than the latest tested version {}",
                version, MAXIMUM_TESTED_VERSION
            ))
            .with_location(path)
            .with_suggestion(suggestions::CHECK_OUTPUT),
        );
    }

    Ok(version)
}

/// Parse a plain `MAJOR.MINOR.PATCH` version.
fn parse_generator_version(value: &str) -> Option<Version> {
    let version = Version::parse(value.trim_end()).ok()?;
    (version.pre.is_empty() && version.build.is_empty()).then_some(version)
}

fn key_not_found(key: &str, path: &Path) -> ConvertError {
    ConvertError::inconsistent(format!("{} not found", key), path)
}
