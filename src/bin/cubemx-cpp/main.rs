//! cubemx-cpp CLI - switch STM32CubeMX-generated CMake projects to C++ sources

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use cubemx_cpp::util::shell::ColorChoice;
use cubemx_cpp::util::{GlobalContext, Shell};
use cubemx_cpp::ConvertError;

/// Exit code for failures outside the validation/rewrite taxonomy.
const EXIT_UNCLASSIFIED: i32 = 255;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let default_filter = if cli.verbose {
        "cubemx_cpp=debug"
    } else {
        "cubemx_cpp=error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = match cli.project_dir.clone() {
        Some(dir) => Ok(GlobalContext::with_project_dir(dir)),
        None => GlobalContext::new(),
    };

    let color = cli
        .color
        .or_else(|| ctx.as_ref().ok().and_then(|c| c.config().color()))
        .unwrap_or(ColorChoice::Auto);
    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        color,
        cli.message_format == MessageFormat::Json,
    );

    let result = ctx.and_then(|ctx| run(cli.command, &ctx, &shell));

    if let Err(e) = result {
        std::process::exit(report_error(&e, &shell));
    }
}

fn run(command: Commands, ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    match command {
        Commands::Convert(args) => commands::convert::execute(args, ctx, shell),
        Commands::Check(args) => commands::check::execute(args, ctx, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error and return the exit code for it.
fn report_error(error: &anyhow::Error, shell: &Shell) -> i32 {
    match error.downcast_ref::<ConvertError>() {
        Some(err) => {
            shell.diagnostic(&err.to_diagnostic());
            err.exit_code()
        }
        None => {
            shell.error(format!("{:#}", error));
            EXIT_UNCLASSIFIED
        }
    }
}
