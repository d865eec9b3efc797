use std::path::Path;

use super::toolchain::Toolchain;
use crate::models::BuildMetrics;
use crate::parse::ToolchainOutputParser;
use crate::sink::{Reporter, Stage};

/// Build the solution in `solution_dir`.
///
/// A launch failure or timeout becomes metrics with a single synthetic error,
/// so a failed build is always a result, never an error.
pub fn run_build(
    toolchain: &Toolchain<'_>,
    solution_dir: &Path,
    parser: &dyn ToolchainOutputParser,
    reporter: &dyn Reporter,
) -> BuildMetrics {
    let stage = Stage::Build;
    reporter.info(stage, "Starting build process...");

    let output = match toolchain.build(solution_dir) {
        Ok(output) => output,
        Err(err) => {
            let message = format!("Build encountered an unexpected error: {err}");
            reporter.error(stage, &message);
            return BuildMetrics::launch_failure(message);
        }
    };

    let combined = output.combined();
    reporter.debug(stage, &format!("Full build output:\n{combined}"));

    if output.timed_out {
        let message = format!(
            "Build timed out after {}s",
            toolchain.timeouts().build().as_secs()
        );
        reporter.error(stage, &message);
        return BuildMetrics {
            raw_output: combined,
            ..BuildMetrics::launch_failure(message)
        };
    }

    let metrics = parser.parse_build(&combined);
    reporter.info(
        stage,
        &format!(
            "Build finished. Success: {}, Duration: {:.2} seconds",
            metrics.success,
            metrics.duration_ms as f64 / 1000.0
        ),
    );
    if !metrics.warnings.is_empty() {
        reporter.info(
            stage,
            &format!("Build generated {} warnings", metrics.warnings.len()),
        );
    }
    if !metrics.success {
        reporter.info(
            stage,
            &format!(
                "Build failed with {} errors; skipping tests.",
                metrics.errors.len()
            ),
        );
    }
    metrics
}
