//! `cubemx-cpp check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use cubemx_cpp::open_project;
use cubemx_cpp::util::shell::Status;
use cubemx_cpp::util::{GlobalContext, Shell};

use super::print_validation_report;

pub fn execute(_args: CheckArgs, ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    shell.status(Status::Checking, ctx.project_dir().display());

    let (identity, report) = open_project(ctx.project_dir())?;
    print_validation_report(shell, &report);

    let version = identity
        .generator_version()
        .map(|v| v.to_string())
        .unwrap_or_default();

    shell.status(
        Status::Checked,
        format!("project `{}` (STM32CubeMX {})", identity.name(), version),
    );
    shell.json_event(&serde_json::json!({
        "reason": "checked",
        "project": identity.name(),
        "generator_version": version,
        "warnings": report.len(),
    }));

    Ok(())
}
