//! `cubemx-cpp convert` command

use anyhow::Result;

use crate::cli::ConvertArgs;
use cubemx_cpp::ops::{BackupOutcome, Substitution};
use cubemx_cpp::util::shell::Status;
use cubemx_cpp::util::{GlobalContext, Shell};
use cubemx_cpp::{convert, open_project, ConvertOptions};

use super::print_validation_report;

pub fn execute(args: ConvertArgs, ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let mut options = ConvertOptions::from_config(ctx.config());
    if args.dry_run {
        options.dry_run = true;
    }
    if args.no_backup {
        options.backup = false;
    }

    let (identity, validation) = open_project(ctx.project_dir())?;
    print_validation_report(shell, &validation);

    if let Some(version) = identity.generator_version() {
        shell.note(format!("STM32CubeMX version {}", version));
    }
    shell.status(
        Status::Converting,
        format!("project `{}`", identity.name()),
    );

    let report = convert(&identity, &options)?;

    for substitution in &report.substitutions {
        print_substitution(shell, substitution, report.dry_run);
    }
    for warning in &report.warnings {
        shell.diagnostic(warning);
    }

    let count = report.substitutions.len();
    let target = cubemx_cpp::core::GENERATOR_BUILD_FILE;
    if report.dry_run {
        shell.status(
            Status::Finished,
            format!("dry run: {} reference(s) in {} would be updated", count, target),
        );
    } else if count == 0 {
        shell.status(
            Status::Finished,
            format!("{} already up to date ({} lines checked)", target, report.lines_read),
        );
    } else {
        shell.status(
            Status::Finished,
            format!("updated {} reference(s) in {}", count, target),
        );
    }

    shell.json_event(&serde_json::json!({
        "reason": "finished",
        "project": identity.name(),
        "generator_version": identity.generator_version().map(|v| v.to_string()),
        "dry_run": report.dry_run,
        "lines_read": report.lines_read,
        "substitutions": count,
    }));

    Ok(())
}

fn print_substitution(shell: &Shell, substitution: &Substitution, dry_run: bool) {
    let status = if dry_run { Status::Skipped } else { Status::Updated };
    shell.status(
        status,
        format!("{} -> {}", substitution.original, substitution.replacement),
    );

    if let BackupOutcome::Renamed { path } = &substitution.backup {
        shell.verbose_status(Status::Info, format!("backed up as {}", path));
    }

    shell.json_event(&serde_json::json!({
        "reason": "substitution",
        "substitution": substitution,
    }));
}
