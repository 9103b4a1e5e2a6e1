//! Command implementations

pub mod check;
pub mod completions;
pub mod convert;

use cubemx_cpp::util::Shell;
use cubemx_cpp::ValidationReport;

/// Print validation warnings in order.
fn print_validation_report(shell: &Shell, report: &ValidationReport) {
    for warning in report.iter() {
        shell.diagnostic(warning);
    }
}
