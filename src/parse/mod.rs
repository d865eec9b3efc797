//! Toolchain output parsing
//!
//! The toolchain only speaks free text, so build and test metrics are
//! recovered by line scanning. All of that is isolated behind
//! [`ToolchainOutputParser`]; a structured-output integration can replace
//! [`DotnetOutputParser`] without touching the stages.

mod build;

use std::collections::HashSet;

use crate::models::{BuildMetrics, TestResult};

pub use build::{parse_build_output, BUILD_SUCCEEDED_MARKER, ERROR_MARKER, WARNING_MARKER};
pub use test::{parse_test_output, FAILURE_MARKER};

/// Turns captured toolchain output into metrics. Never fails.
pub trait ToolchainOutputParser {
    fn parse_build(&self, output: &str) -> BuildMetrics;
    fn parse_test(&self, output: &str) -> TestResult;
}

/// Parser for the text printed by `dotnet build` / `dotnet test`
#[derive(Debug, Default, Clone, Copy)]
pub struct DotnetOutputParser;

impl ToolchainOutputParser for DotnetOutputParser {
    fn parse_build(&self, output: &str) -> BuildMetrics {
        parse_build_output(output)
    }

    fn parse_test(&self, output: &str) -> TestResult {
        parse_test_output(output)
    }
}

/// Lines containing `marker`, deduplicated by exact text in first-seen order
pub(crate) fn distinct_lines_containing(output: &str, marker: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .filter(|line| line.contains(marker))
        .filter(|line| seen.insert(*line))
        .map(String::from)
        .collect()
}
