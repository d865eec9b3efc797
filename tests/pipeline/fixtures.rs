//! Sample generated code, ground truth and toolchain output

use gencheck::config::ValidatorConfig;
use gencheck::pipeline::{RetentionPolicy, Validator};
use gencheck::models::{ValidationInput, ValidationReport};
use gencheck::retry::RetryPolicy;
use gencheck::sink::MemoryReporter;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::helpers::{FakeRunner, Scripted, ANALYZER};

pub const POWER_IMPLEMENTATION: &str = r#"
using OutSystems.ExternalLibraries.SDK;

[OSInterface]
public interface IPower { double Power(double b, double e); }

public class Power : IPower {
    public double Power(double b, double e) => System.Math.Pow(b, e);
}
"#;

pub const POWER_TESTS: &str = r#"
using Xunit;

public class PowerTests {
    [Fact]
    public void Squares() => Assert.Equal(9, new Power().Power(3, 2));
}
"#;

pub const ONE_PARAM_GROUND_TRUTH: &str = "\
description: Square a number
actions:
  Square:
    params:
      value: { type: int }
";

pub const TWO_PARAM_GROUND_TRUTH: &str = "\
description: Raise a base to an exponent
actions:
  Power:
    params:
      base: { type: double }
      exponent: { type: double }
";

pub const BUILD_SUCCEEDED: &str = "\
  Determining projects to restore...
  Power -> /tmp/Power/Power/bin/Debug/net8.0/Power.dll
  LLMGeneratedTests -> /tmp/Power/LLMGeneratedTests/bin/Debug/net8.0/LLMGeneratedTests.dll

Build succeeded.
    0 Warning(s)
    0 Error(s)

Time Elapsed 00:00:06.51
";

pub const BUILD_FAILED: &str = "\
/tmp/Power/Power/Power.cs(7,52): error CS0103: The name 'Mathh' does not exist in the current context [/tmp/Power/Power/Power.csproj]

Build FAILED.

/tmp/Power/Power/Power.cs(7,52): error CS0103: The name 'Mathh' does not exist in the current context [/tmp/Power/Power/Power.csproj]
    0 Warning(s)
    1 Error(s)

Time Elapsed 00:00:03.02
";

pub const TESTS_PASSED: &str =
    "Passed!  - Failed:     0, Passed:     1, Skipped:     0, Total:     1, Duration: 48 ms - LLMGeneratedTests.dll (net8.0)";

/// A config whose scratch directories land under `work_root`
pub fn config_in(work_root: &Path) -> ValidatorConfig {
    let mut config = ValidatorConfig::default();
    config.analysis.program = ANALYZER.to_string();
    config.retention.work_root = Some(work_root.to_path_buf());
    config
}

/// A runner where everything succeeds and the class is `Power`
pub fn happy_runner() -> FakeRunner {
    FakeRunner::new()
        .on(&["--classname"], Scripted::ok("Power\n"))
        .on(&["build"], Scripted::ok(BUILD_SUCCEEDED))
        .on(&["test"], Scripted::ok(TESTS_PASSED))
}

pub fn write_ground_truth(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("power.yaml");
    fs::write(&path, content).expect("write ground truth");
    path
}

pub fn input() -> ValidationInput {
    ValidationInput::new(POWER_IMPLEMENTATION, POWER_TESTS)
}

/// Run one validation without waiting between scaffold attempts
pub fn run(
    config: &ValidatorConfig,
    runner: &FakeRunner,
    reporter: &MemoryReporter,
    input: &ValidationInput,
    retention: &RetentionPolicy,
) -> ValidationReport {
    Validator::new(config, runner, reporter)
        .with_scaffold_retry(RetryPolicy::once_after(Duration::ZERO))
        .validate(input, retention)
        .expect("scratch directory should be creatable")
}

/// Entries directly under `dir`, zero when it does not exist
pub fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|e| e.count()).unwrap_or(0)
}
