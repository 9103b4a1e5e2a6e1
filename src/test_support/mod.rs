//! Test utilities for cubemx-cpp unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::GeneratedProjectFixture;
//!
//! #[test]
//! fn test_example() {
//!     let (_tmp, root) = GeneratedProjectFixture::new("BlinkyF4")
//!         .with_file("Core/Src/main.cpp", "int main() {}\n")
//!         .create();
//!     // Validate / rewrite the project under `root`...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
