//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cubemx_cpp::util::shell::ColorChoice;

/// cubemx-cpp - switch STM32CubeMX-generated CMake projects to C++ sources
#[derive(Parser)]
#[command(name = "cubemx-cpp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the project and switch C sources to their C++ counterparts
    Convert(ConvertArgs),

    /// Validate the project without changing anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Show what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Leave superseded .c files in place instead of renaming them to .c.bak
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
