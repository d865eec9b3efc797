use regex::Regex;
use std::sync::LazyLock;

use super::distinct_lines_containing;
use crate::models::BuildMetrics;

pub const WARNING_MARKER: &str = ": warning ";
pub const ERROR_MARKER: &str = ": error ";
pub const BUILD_SUCCEEDED_MARKER: &str = "Build succeeded";

static TIME_ELAPSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Time Elapsed\s+(\d+):(\d+):([\d.]+)").expect("Invalid regex pattern")
});

/// Extract warnings, errors, success and duration from build output.
///
/// Success needs both the success marker and an empty error list; the
/// toolchain can print the marker while errors were still detected.
pub fn parse_build_output(output: &str) -> BuildMetrics {
    let warnings = distinct_lines_containing(output, WARNING_MARKER);
    let errors = distinct_lines_containing(output, ERROR_MARKER);
    let success = output.contains(BUILD_SUCCEEDED_MARKER) && errors.is_empty();

    BuildMetrics {
        warnings,
        errors,
        success,
        duration_ms: parse_elapsed_ms(output),
        raw_output: output.to_string(),
    }
}

/// Milliseconds from the `Time Elapsed HH:MM:SS.fff` line, 0 when absent or unreadable
fn parse_elapsed_ms(output: &str) -> u64 {
    let Some(caps) = TIME_ELAPSED.captures(output) else {
        return 0;
    };

    let parsed = (|| {
        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: f64 = caps[3].parse().ok()?;
        let whole = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?;
        Some((whole as f64 + seconds) * 1000.0)
    })();

    match parsed {
        Some(ms) => ms.round() as u64,
        None => {
            tracing::warn!(line = &caps[0], "Failed to parse build duration");
            0
        }
    }
}
