//! Core data structures for cubemx-cpp.
//!
//! This module contains the foundational types used throughout the crate:
//! - Project identity and the generated project layout
//! - Manifest (`.ioc`) line parsing
//! - C source references in the generator build file
//! - The fatal error taxonomy

pub mod errors;
pub mod ioc;
pub mod project;
pub mod reference;

pub use errors::ConvertError;
pub use ioc::IocEntry;
pub use project::{
    ProjectIdentity, GENERATOR_BUILD_FILE, MAIN_BUILD_FILE, MAXIMUM_TESTED_VERSION,
    MINIMUM_SUPPORTED_VERSION,
};
pub use reference::{SourceReference, CPP_EXTENSIONS, SOURCE_DIR_PREFIX};
