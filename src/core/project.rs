//! Project identity and the fixed layout of a generated project.
//!
//! A [`ProjectIdentity`] starts out with defaults derived from the project
//! directory and is filled in by the validator. Once validation succeeds
//! it is frozen: there are no setters, and re-running validation is a no-op.

use std::path::{Path, PathBuf};

use semver::Version;

/// Primary build description at the project root.
pub const MAIN_BUILD_FILE: &str = "CMakeLists.txt";

/// Build file written by the generator; this is the file that gets rewritten.
pub const GENERATOR_BUILD_FILE: &str = "cmake/stm32cubemx/CMakeLists.txt";

/// Extension of the generator manifest.
pub const MANIFEST_EXTENSION: &str = "ioc";

/// Suffix of the scratch file written next to the generator build file.
pub const SCRATCH_SUFFIX: &str = ".tmp";

/// Oldest generator release whose output layout we understand.
pub const MINIMUM_SUPPORTED_VERSION: Version = Version::new(6, 15, 0);

/// Newest generator release the rewrite has been checked against.
pub const MAXIMUM_TESTED_VERSION: Version = Version::new(6, 15, 0);

/// Identity of the generated project being converted.
#[derive(Debug, Clone)]
pub struct ProjectIdentity {
    root: PathBuf,
    name: String,
    manifest_path: PathBuf,
    generator_version: Option<Version>,
    initialized: bool,
}

impl ProjectIdentity {
    /// Create an identity for the project rooted at `root`.
    ///
    /// The name defaults to the directory's base name until the main build
    /// file says otherwise.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = default_project_name(&root);
        let manifest_path = manifest_path_for(&root, &name);

        ProjectIdentity {
            root,
            name,
            manifest_path,
            generator_version: None,
            initialized: false,
        }
    }

    /// Project directory every other path is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of `{name}.ioc`.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Generator version confirmed by the manifest, if validated.
    pub fn generator_version(&self) -> Option<&Version> {
        self.generator_version.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn main_build_file(&self) -> PathBuf {
        self.root.join(MAIN_BUILD_FILE)
    }

    pub fn generator_build_file(&self) -> PathBuf {
        self.root.join(GENERATOR_BUILD_FILE)
    }

    /// Change the project name, keeping the manifest path in step.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.manifest_path = manifest_path_for(&self.root, &self.name);
    }

    /// Commit the validated version and freeze the identity.
    pub(crate) fn finish(&mut self, generator_version: Version) {
        self.generator_version = Some(generator_version);
        self.initialized = true;
    }
}

fn default_project_name(root: &Path) -> String {
    // `.` has no file name; fall back to the absolute directory's name.
    let named = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            std::path::absolute(root)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        });

    named.unwrap_or_default()
}

fn manifest_path_for(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{}.{}", name, MANIFEST_EXTENSION))
}
