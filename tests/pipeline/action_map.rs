use gencheck::models::Outcome;
use gencheck::pipeline::RetentionPolicy;
use gencheck::sink::{MemoryReporter, Stage};
use std::sync::Arc;
use tempfile::TempDir;

use super::fixtures::*;
use super::helpers::*;

#[test]
fn test_mismatched_action_map_never_builds() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(tmp.path(), TWO_PARAM_GROUND_TRUTH);
    let runner = happy_runner().on(&["--map"], Scripted::ok("2(0)\n"));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::new(None, true),
    );

    let info = report.action_map_info.as_ref().unwrap();
    assert_eq!(info.implementation, "2(0)");
    assert_eq!(info.ground_truth, "1(2)");
    assert!(!info.matches);
    assert_eq!(report.outcome, Outcome::ActionMapRejected);
    assert!(!report.build_metrics.attempted());
    assert!(report.llm_test_results.is_none());
    assert_eq!(runner.count(&["build"]), 0);
    assert_eq!(runner.count(&["new", "sln"]), 0);
    assert!(!report.is_success());
}

#[test]
fn test_single_parameter_runs_both_suites_without_assistant() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(tmp.path(), ONE_PARAM_GROUND_TRUTH);
    let runner = happy_runner().on(&["--map"], Scripted::ok("1(1)"));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::default(),
    );

    assert_eq!(report.outcome, Outcome::Tested);
    assert!(report.action_map_info.as_ref().unwrap().matches);
    assert_eq!(report.ground_truth_test_results.map(|r| r.passed), Some(1));
    assert_eq!(runner.count(&["--report"]), 0);

    let generation = runner.generation_call().unwrap();
    assert!(!generation.args.iter().any(|a| a == "--paramMap"));
}

#[test]
fn test_two_parameters_request_one_mapping() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(tmp.path(), TWO_PARAM_GROUND_TRUTH);
    let runner = happy_runner()
        .on(&["--map"], Scripted::ok("1(2)"))
        .on(&["--report"], Scripted::ok("Ground truth: Power(base, exponent)\nImplementation: Power(b, e)"));
    let assistant = Arc::new(FakeAssistant::replying(
        "(Power:base=Power:b), (Power:exponent=Power:e)",
    ));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input()
            .with_ground_truth(&ground_truth)
            .with_assistant(assistant.clone()),
        &RetentionPolicy::default(),
    );

    assert_eq!(assistant.requests(), 1);
    assert_eq!(runner.count(&["--report"]), 1);
    assert_eq!(report.outcome, Outcome::Tested);

    let generation = runner.generation_call().unwrap();
    let flag = generation.args.iter().position(|a| a == "--paramMap").unwrap();
    assert_eq!(
        generation.args[flag + 1],
        "(Power:base=Power:b),(Power:exponent=Power:e)"
    );
}

#[test]
fn test_malformed_mapping_stops_before_build() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(tmp.path(), TWO_PARAM_GROUND_TRUTH);
    let runner = happy_runner()
        .on(&["--map"], Scripted::ok("1(2)"))
        .on(&["--report"], Scripted::ok("report"));
    let assistant = Arc::new(FakeAssistant::replying("base maps to b, exponent to e"));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input()
            .with_ground_truth(&ground_truth)
            .with_assistant(assistant.clone()),
        &RetentionPolicy::default(),
    );

    assert_eq!(assistant.requests(), 1);
    assert_eq!(report.outcome, Outcome::ActionMapRejected);
    assert!(report
        .analysis_output
        .starts_with("Failed to generate parameter mapping"));
    assert!(report.action_map_info.as_ref().unwrap().matches);
    assert_eq!(runner.count(&["build"]), 0);
    assert!(runner.generation_call().is_none());
}

#[test]
fn test_two_parameters_without_assistant_stop() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(tmp.path(), TWO_PARAM_GROUND_TRUTH);
    let runner = happy_runner().on(&["--map"], Scripted::ok("1(2)"));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::default(),
    );

    assert_eq!(report.outcome, Outcome::ActionMapRejected);
    assert!(report.analysis_output.contains("no correlation assistant"));
    assert_eq!(runner.count(&["--report"]), 0);
    assert!(!reporter.for_stage(Stage::GroundTruthTests).is_empty());
}

#[test]
fn test_multiple_matching_actions_are_not_scored() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let ground_truth = write_ground_truth(
        tmp.path(),
        "actions:\n  Add:\n    params: [a, b]\n  Negate:\n    params: [a]\n",
    );
    let runner = happy_runner().on(&["--map"], Scripted::ok("2(1, 2)"));
    let reporter = MemoryReporter::new();

    let report = run(
        &config,
        &runner,
        &reporter,
        &input().with_ground_truth(&ground_truth),
        &RetentionPolicy::default(),
    );

    assert!(report.action_map_info.as_ref().unwrap().matches);
    assert_eq!(report.outcome, Outcome::ActionMapRejected);
    assert!(report.analysis_output.contains("2 actions"));
    assert_eq!(runner.count(&["build"]), 0);
}
