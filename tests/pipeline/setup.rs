use gencheck::models::Outcome;
use gencheck::pipeline::RetentionPolicy;
use gencheck::sink::{MemoryReporter, Stage};
use tempfile::TempDir;

use super::fixtures::*;
use super::helpers::*;

#[test]
fn test_optional_package_failure_is_recorded() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let runner = happy_runner().on(
        &["add", "package", "CsvHelper"],
        Scripted::fail("error: NU1101: Unable to find package CsvHelper"),
    );
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_packages("CsvHelper, Newtonsoft.Json"),
        &RetentionPolicy::default(),
    );

    assert_eq!(report.outcome, Outcome::Tested);
    assert_eq!(report.failed_packages, vec!["CsvHelper".to_string()]);
    assert_eq!(runner.count(&["add", "package", "Newtonsoft.Json"]), 1);
}

#[test]
fn test_required_package_failure_stops_setup() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let runner = FakeRunner::new()
        .on(&["--classname"], Scripted::ok("Power"))
        .on(
            &["add", "package", "CustomCode.Analyzer"],
            Scripted::fail("error: NU1301: Unable to load the service index"),
        );
    let reporter = MemoryReporter::new();

    let report = run(&config, &runner, &reporter, &input(), &RetentionPolicy::new(None, true));

    assert_eq!(report.outcome, Outcome::SetupFailed);
    assert!(report.analysis_output.contains("NU1301"));
    assert_eq!(runner.count(&["new", "xunit"]), 0);
    assert_eq!(runner.count(&["build"]), 0);
    assert!(report.solution_dir.is_none());
}

#[test]
fn test_scaffold_is_retried_once() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let runner = happy_runner().once(&["new", "classlib"], Scripted::Timeout);
    let reporter = MemoryReporter::new();

    let report = run(&config, &runner, &reporter, &input(), &RetentionPolicy::default());

    assert_eq!(report.outcome, Outcome::Tested);
    let scaffolds: Vec<_> = runner
        .calls()
        .into_iter()
        .filter(|c| c.args.starts_with(&["new".to_string(), "classlib".to_string()]))
        .collect();
    assert_eq!(scaffolds.len(), 2);
    assert!(scaffolds[1].timeout > scaffolds[0].timeout);
}

#[test]
fn test_missing_toolchain_fails_setup() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let runner = FakeRunner::new()
        .on(&["--classname"], Scripted::ok("Power"))
        .on(&["new"], Scripted::Missing);
    let reporter = MemoryReporter::new();

    let report = run(&config, &runner, &reporter, &input(), &RetentionPolicy::default());

    assert_eq!(report.outcome, Outcome::SetupFailed);
    assert!(!reporter.for_stage(Stage::Solution).is_empty());
}

#[test]
fn test_unresolved_class_name_stops_first() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let runner = FakeRunner::new().on(&["--classname"], Scripted::ok("\n"));
    let reporter = MemoryReporter::new();

    let report = run(&config, &runner, &reporter, &input(), &RetentionPolicy::default());

    assert_eq!(report.outcome, Outcome::ClassNameUnresolved);
    assert_eq!(runner.calls().len(), 1);
}
