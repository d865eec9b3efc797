use gencheck::models::{Outcome, ReflectionFeedback};
use gencheck::pipeline::RetentionPolicy;
use gencheck::sink::MemoryReporter;
use tempfile::TempDir;

use super::fixtures::*;
use super::helpers::*;

fn failing_build_runner() -> FakeRunner {
    FakeRunner::new()
        .on(&["--classname"], Scripted::ok("Power"))
        .on(&["--map"], Scripted::ok("1(1)"))
        .on(&["build"], Scripted::fail(BUILD_FAILED))
}

#[test]
fn test_failed_build_is_discarded_by_default() {
    let tmp = TempDir::new().unwrap();
    let scratch = tmp.path().join("scratch");
    let config = config_in(&scratch);
    let ground_truth = write_ground_truth(tmp.path(), ONE_PARAM_GROUND_TRUTH);
    let runner = failing_build_runner();
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::new(None, false),
    );

    assert_eq!(report.outcome, Outcome::BuildFailed);
    assert!(report.build_metrics.attempted());
    assert!(!report.build_metrics.success);
    assert_eq!(report.build_metrics.errors.len(), 1);
    assert_eq!(report.build_metrics.duration_ms, 3020);
    assert!(report.action_map_info.as_ref().unwrap().matches);
    assert!(report.llm_test_results.is_none());
    assert_eq!(runner.count(&["test"]), 0);
    assert!(report.solution_dir.is_none());
    assert_eq!(entries(&scratch), 0);
    assert!(matches!(
        report.reflection_feedback(),
        Some(ReflectionFeedback::BuildFailed { .. })
    ));
}

#[test]
fn test_failed_build_is_kept_when_requested() {
    let tmp = TempDir::new().unwrap();
    let scratch = tmp.path().join("scratch");
    let config = config_in(&scratch);
    let ground_truth = write_ground_truth(tmp.path(), ONE_PARAM_GROUND_TRUTH);
    let runner = failing_build_runner();
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::new(None, true),
    );

    let kept = report.solution_dir.expect("failed build should be retained");
    assert!(kept.starts_with(&scratch));
    assert!(kept.ends_with("Power"));
    assert!(kept.join("Power/Power.cs").exists());
    assert!(kept.join("GroundTruthTests").is_dir());
}

#[test]
fn test_success_is_copied_to_target_without_build_output() {
    let tmp = TempDir::new().unwrap();
    let scratch = tmp.path().join("scratch");
    let target = tmp.path().join("solutions");
    let config = config_in(&scratch);
    let runner = happy_runner();
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input(),
        &RetentionPolicy::new(Some(target.clone()), false),
    );

    assert!(report.is_success());
    assert_eq!(report.solution_dir, Some(target.join("Power")));
    assert!(target.join("Power/Power/Power.cs").exists());
    assert!(target.join("Power/LLMGeneratedTests/PowerTests.cs").exists());
    assert_eq!(entries(&scratch), 0);
}

#[test]
fn test_retained_tree_replaces_previous_copy() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("solutions");
    std::fs::create_dir_all(target.join("Power")).unwrap();
    std::fs::write(target.join("Power/stale.txt"), "previous run").unwrap();
    let config = config_in(&tmp.path().join("scratch"));
    let runner = happy_runner();
    let reporter = MemoryReporter::new();

    run(
        &config,
        &runner,
        &reporter,
        &input(),
        &RetentionPolicy::new(Some(target.clone()), false),
    );

    assert!(!target.join("Power/stale.txt").exists());
    assert!(target.join("Power/Power/Power.cs").exists());
}
