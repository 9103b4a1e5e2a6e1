//! cubemx-cpp - switch STM32CubeMX-generated CMake projects to C++ sources
//!
//! After STM32CubeMX regenerates a project, its
//! `cmake/stm32cubemx/CMakeLists.txt` lists `.c` files again. This crate
//! validates the generated project and rewrites every listed C source that
//! has a `.cpp`, `.cxx` or `.cc` counterpart on disk.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for cubemx-cpp unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk generated project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{ConvertError, ProjectIdentity, SourceReference};
pub use ops::{
    convert, open_project, ConvertOptions, ReferenceRewriter, RewriteReport, ValidationReport,
};
pub use util::context::GlobalContext;
