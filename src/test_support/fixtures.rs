//! Test fixtures for common test scenarios.
//!
//! This module provides a generator for on-disk STM32CubeMX projects in
//! the shape the validator and rewriter expect.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::ioc::{KEY_GENERATOR_VERSION, KEY_PROJECT_NAME, KEY_TARGET_TOOLCHAIN};

/// Fixture for a generated project directory.
#[derive(Debug, Clone)]
pub struct GeneratedProjectFixture {
    /// Name used for the `.ioc` file.
    pub name: String,
    /// Value of the `set(CMAKE_PROJECT_NAME ...)` line, if any.
    pub cmake_project_name: Option<String>,
    /// Unescaped `ProjectManager.ProjectName` value.
    pub ioc_project_name: String,
    pub toolchain: String,
    pub version: String,
    /// Manifest keys to leave out.
    pub omitted_keys: Vec<String>,
    /// Lines appended to the manifest.
    pub extra_ioc_lines: Vec<String>,
    /// `.c` sources listed in the generator build file and created on disk.
    pub sources: Vec<String>,
    /// Extra files (path relative to project root -> content).
    pub files: Vec<(PathBuf, String)>,
    pub main_build_file: bool,
    pub generator_build_file: bool,
}

impl GeneratedProjectFixture {
    /// Directory name of the project inside the temp dir.
    pub const DIR_NAME: &'static str = "workspace";

    /// A valid project generated by STM32CubeMX 6.15.0.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        GeneratedProjectFixture {
            cmake_project_name: Some(name.clone()),
            ioc_project_name: name.clone(),
            name,
            toolchain: "CMake".to_string(),
            version: "6.15.0".to_string(),
            omitted_keys: Vec::new(),
            extra_ioc_lines: Vec::new(),
            sources: vec![
                "Core/Src/main.c".to_string(),
                "Core/Src/gpio.c".to_string(),
                "Core/Src/stm32f4xx_it.c".to_string(),
            ],
            files: Vec::new(),
            main_build_file: true,
            generator_build_file: true,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_toolchain(mut self, toolchain: impl Into<String>) -> Self {
        self.toolchain = toolchain.into();
        self
    }

    pub fn with_ioc_project_name(mut self, name: impl Into<String>) -> Self {
        self.ioc_project_name = name.into();
        self
    }

    pub fn with_cmake_project_name(mut self, name: impl Into<String>) -> Self {
        self.cmake_project_name = Some(name.into());
        self
    }

    /// Drop the project name line; the manifest then follows the directory name.
    pub fn without_project_name_line(mut self) -> Self {
        self.cmake_project_name = None;
        self.name = Self::DIR_NAME.to_string();
        self.ioc_project_name = Self::DIR_NAME.to_string();
        self
    }

    pub fn without_ioc_key(mut self, key: &str) -> Self {
        self.omitted_keys.push(key.to_string());
        self
    }

    pub fn with_extra_ioc_line(mut self, line: impl Into<String>) -> Self {
        self.extra_ioc_lines.push(line.into());
        self
    }

    /// Replace the listed C sources.
    pub fn with_sources(mut self, sources: &[&str]) -> Self {
        self.sources = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a file to the project.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn without_main_build_file(mut self) -> Self {
        self.main_build_file = false;
        self
    }

    pub fn without_generator_build_file(mut self) -> Self {
        self.generator_build_file = false;
        self
    }

    /// Write the fixture into a fresh temp directory.
    ///
    /// Returns the temp dir guard and the project root inside it.
    pub fn create(&self) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = tmp.path().join(Self::DIR_NAME);
        self.write_to(&root).expect("failed to write fixture");
        (tmp, root)
    }

    /// Write this fixture to a real directory.
    pub fn write_to(&self, root: &Path) -> anyhow::Result<()> {
        if self.main_build_file {
            write_string(&root.join("CMakeLists.txt"), &self.main_build_file_content())?;
        }

        write_string(
            &root.join(format!("{}.ioc", self.name)),
            &self.manifest_content(),
        )?;

        if self.generator_build_file {
            write_string(
                &root.join("cmake/stm32cubemx/CMakeLists.txt"),
                &self.generator_build_file_content(),
            )?;
        }

        for source in &self.sources {
            write_string(&root.join(source), &format!("/* {} */\n", source))?;
        }

        for (path, content) in &self.files {
            write_string(&root.join(path), content)?;
        }

        Ok(())
    }

    pub fn main_build_file_content(&self) -> String {
        let project_line = match &self.cmake_project_name {
            Some(name) => format!("set(CMAKE_PROJECT_NAME {})\n", name),
            None => String::new(),
        };

        format!(
            r#"cmake_minimum_required(VERSION 3.22)

# Setup compiler settings
set(CMAKE_C_STANDARD 11)
set(CMAKE_C_STANDARD_REQUIRED ON)
set(CMAKE_C_EXTENSIONS ON)

# Define the build type
if(NOT CMAKE_BUILD_TYPE)
    set(CMAKE_BUILD_TYPE "Debug")
endif()

# Set the project name
{project_line}
# Include toolchain file
include("cmake/gcc-arm-none-eabi.cmake")

# Core project settings
project(${{CMAKE_PROJECT_NAME}})

# Create an executable object type
add_executable(${{CMAKE_PROJECT_NAME}})

# Add STM32CubeMX generated sources
add_subdirectory(cmake/stm32cubemx)
"#
        )
    }

    pub fn manifest_content(&self) -> String {
        let escaped_name = self.ioc_project_name.replace(' ', "\\ ");
        let entries = [
            ("File.Version", "6".to_string()),
            ("Mcu.Family", "STM32F4".to_string()),
            ("Mcu.UserName", "STM32F407VGTx".to_string()),
            (KEY_GENERATOR_VERSION, self.version.clone()),
            ("MxDb.Version", "DB.6.0.150".to_string()),
            (
                "ProjectManager.ProjectFileName",
                format!("{}.ioc", escaped_name),
            ),
            (KEY_PROJECT_NAME, escaped_name.clone()),
            (KEY_TARGET_TOOLCHAIN, self.toolchain.clone()),
            ("ProjectManager.ToolChainLocation", String::new()),
        ];

        let mut content = String::from("#MicroXplorer Configuration settings - do not modify\n");
        for (key, value) in entries {
            if self.omitted_keys.iter().any(|k| k == key) {
                continue;
            }
            content.push_str(&format!("{}={}\n", key, value));
        }
        for line in &self.extra_ioc_lines {
            content.push_str(line);
            content.push('\n');
        }
        content
    }

    pub fn generator_build_file_content(&self) -> String {
        let sources: String = self
            .sources
            .iter()
            .map(|s| format!("    ${{CMAKE_CURRENT_SOURCE_DIR}}/../../{}\n", s))
            .collect();

        format!(
            r#"cmake_minimum_required(VERSION 3.22)
# Enable CMake support for ASM and C languages
enable_language(C ASM)
# STM32CubeMX generated symbols (macros)
set(MX_Defines_Syms
	USE_HAL_DRIVER
	STM32F407xx
    $<$<CONFIG:Debug>:DEBUG>
)

# STM32CubeMX generated include paths
set(MX_Include_Dirs
    ${{CMAKE_CURRENT_SOURCE_DIR}}/../../Core/Inc
    ${{CMAKE_CURRENT_SOURCE_DIR}}/../../Drivers/STM32F4xx_HAL_Driver/Inc
)

# STM32CubeMX generated application sources
set(MX_Application_Src
{sources}    ${{CMAKE_CURRENT_SOURCE_DIR}}/../../startup_stm32f407xx.s
)

add_library(stm32cubemx INTERFACE)
target_include_directories(stm32cubemx INTERFACE ${{MX_Include_Dirs}})
target_compile_definitions(stm32cubemx INTERFACE ${{MX_Defines_Syms}})
"#
        )
    }
}

/// Write a file, creating parent directories if needed.
fn write_string(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let (_tmp, root) = GeneratedProjectFixture::new("BlinkyF4").create();

        assert!(root.join("CMakeLists.txt").exists());
        assert!(root.join("BlinkyF4.ioc").exists());
        assert!(root.join("cmake/stm32cubemx/CMakeLists.txt").exists());
        assert!(root.join("Core/Src/main.c").exists());
    }

    #[test]
    fn test_manifest_escapes_spaces() {
        let content = GeneratedProjectFixture::new("My Project").manifest_content();
        assert!(content.contains("ProjectManager.ProjectName=My\\ Project\n"));
    }
}
