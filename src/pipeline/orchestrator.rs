//! The validation state machine
//!
//! ```text
//! class name ──► setup ──► action map* ──► build ──► tests ──► retention
//!     │            │            │            │
//!     ▼            ▼            ▼            ▼
//!  terminal     terminal     terminal    BuildFailed
//! ```
//!
//! `*` only with ground truth. Every stop produces a report; only a failure
//! to create the scratch directory is an error.

use chrono::Utc;
use std::fs;
use tempfile::TempDir;

use super::action_map::{validate_action_map, ActionMapVerdict};
use super::build::run_build;
use super::error::{SetupError, ValidationError};
use super::layout::SolutionLayout;
use super::retention::{replace_tree, RetentionDecision, RetentionPolicy};
use super::setup::ProjectSetup;
use super::test::run_tests;
use super::toolchain::Toolchain;
use super::StageRun;
use crate::analysis::AnalysisTool;
use crate::config::ValidatorConfig;
use crate::models::{Outcome, ValidationInput, ValidationReport};
use crate::parse::{DotnetOutputParser, ToolchainOutputParser};
use crate::process::CommandRunner;
use crate::retry::RetryPolicy;
use crate::sink::{Reporter, Stage};

/// Runs validations with a fixed configuration and set of collaborators.
///
/// Holds no per-run state; each [`Validator::validate`] call works in its own
/// scratch directory.
pub struct Validator<'a> {
    config: &'a ValidatorConfig,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    parser: &'a dyn ToolchainOutputParser,
    retry: Option<RetryPolicy>,
}

/// What setup handed on to the build
struct Prepared {
    analysis_output: String,
    action_map: StageRun<ActionMapVerdict>,
}

impl<'a> Validator<'a> {
    pub fn new(
        config: &'a ValidatorConfig,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            runner,
            reporter,
            parser: &DotnetOutputParser,
            retry: None,
        }
    }

    pub fn with_parser(mut self, parser: &'a dyn ToolchainOutputParser) -> Self {
        self.parser = parser;
        self
    }

    /// Override the scaffold retry, which otherwise follows the configured backoff
    pub fn with_scaffold_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn validate(
        &self,
        input: &ValidationInput,
        retention: &RetentionPolicy,
    ) -> Result<ValidationReport, ValidationError> {
        let started_at = Utc::now();
        let workspace = self.create_workspace()?;
        self.reporter.info(Stage::ClassName, "Starting code validation...");

        let analysis = AnalysisTool::new(
            &self.config.analysis.program,
            self.config.timeouts.analysis(),
            self.runner,
        );

        let class_name = match analysis.class_name(input.implementation_code()) {
            Ok(name) => name,
            Err(err) => {
                self.reporter
                    .error(Stage::ClassName, &format!("No valid public class found: {err}"));
                return Ok(ValidationReport::terminal(
                    Outcome::ClassNameUnresolved,
                    err.diagnostic(),
                    started_at,
                ));
            }
        };
        self.reporter
            .info(Stage::ClassName, &format!("Validating class '{class_name}'"));

        let layout = SolutionLayout::new(workspace.path().join(&class_name), &class_name);
        let toolchain = Toolchain::new(&self.config.toolchain, &self.config.timeouts, self.runner);
        let mut setup = ProjectSetup::new(&toolchain, &layout, self.reporter);
        if let Some(retry) = self.retry {
            setup = setup.with_retry(retry);
        }

        let mut failed_packages = Vec::new();
        let prepared = match self.prepare(&setup, &analysis, &layout, input, &mut failed_packages) {
            Ok(prepared) => prepared,
            Err(err) => {
                self.reporter
                    .error(Stage::Solution, &format!("Project setup failed: {err}"));
                let mut report =
                    ValidationReport::terminal(Outcome::SetupFailed, err.diagnostic(), started_at);
                report.failed_packages = failed_packages;
                return Ok(report);
            }
        };

        let mut report = ValidationReport::terminal(
            Outcome::ActionMapRejected,
            prepared.analysis_output,
            started_at,
        );
        report.failed_packages = failed_packages;
        let with_ground_truth = !prepared.action_map.is_skipped();

        if let StageRun::Ran(verdict) = prepared.action_map {
            report.action_map_info = verdict.info().cloned();
            if !verdict.should_continue() {
                self.reporter
                    .info(Stage::ActionMap, "Skipping build based on action map validation.");
                report.finished_at = Utc::now();
                return Ok(report);
            }
        }

        report.build_metrics = run_build(&toolchain, layout.root(), self.parser, self.reporter);
        let build_succeeded = report.build_metrics.success;

        if build_succeeded {
            let runs = run_tests(&toolchain, &layout, with_ground_truth, self.parser, self.reporter);
            report.outcome = Outcome::Tested;
            report.llm_test_results = Some(runs.llm);
            report.ground_truth_test_results = runs.ground_truth.ran();
        } else {
            report.outcome = Outcome::BuildFailed;
        }

        report.solution_dir = match retention.decide(build_succeeded, &class_name) {
            RetentionDecision::Discard => None,
            RetentionDecision::KeepInPlace => {
                let kept = workspace.keep().join(&class_name);
                self.reporter.info(
                    Stage::Retention,
                    &format!("Solution kept at {}; remove it when done", kept.display()),
                );
                Some(kept)
            }
            RetentionDecision::CopyTo(dest) => {
                self.reporter.info(
                    Stage::Retention,
                    &format!("Copying solution to {}", dest.display()),
                );
                match replace_tree(layout.root(), &dest) {
                    Ok(()) => Some(dest),
                    Err(err) => {
                        self.reporter.error(
                            Stage::Retention,
                            &format!("Failed to copy solution to target directory: {err}"),
                        );
                        Some(workspace.keep().join(&class_name))
                    }
                }
            }
        };

        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Setup through solution assembly, with the action-map check in between.
    ///
    /// The solution is only assembled when the run will go on to build.
    /// Optional packages that failed land in `failed_packages` even when a
    /// later step fails.
    fn prepare(
        &self,
        setup: &ProjectSetup<'_>,
        analysis: &AnalysisTool<'_>,
        layout: &SolutionLayout,
        input: &ValidationInput,
        failed_packages: &mut Vec<String>,
    ) -> Result<Prepared, SetupError> {
        let toolchain = &self.config.toolchain;
        fs::create_dir_all(layout.root()).map_err(|e| SetupError::write(layout.root(), e))?;

        setup.create_implementation(input.implementation_code(), &toolchain.required_packages)?;
        *failed_packages = setup.install_optional_packages(&input.optional_packages());
        setup.create_llm_tests(input.unit_test_code(), &toolchain.test_packages)?;

        let mut analysis_output = String::new();
        let action_map = match input.ground_truth() {
            None => StageRun::Skipped,
            Some(ground_truth) => {
                setup.create_ground_truth_project(&toolchain.ground_truth_test_packages)?;
                let verdict = validate_action_map(
                    analysis,
                    layout,
                    ground_truth,
                    input.assistant(),
                    self.reporter,
                );
                match &verdict {
                    ActionMapVerdict::Proceed { param_mapping, .. } => {
                        analysis_output = setup.generate_ground_truth_tests(
                            analysis,
                            ground_truth,
                            param_mapping.as_ref(),
                        );
                    }
                    ActionMapVerdict::Stop { reason, .. } => analysis_output = reason.to_string(),
                }
                StageRun::Ran(verdict)
            }
        };

        let will_build = match &action_map {
            StageRun::Ran(verdict) => verdict.should_continue(),
            StageRun::Skipped => true,
        };
        if will_build {
            setup.assemble_solution(!action_map.is_skipped())?;
        }

        Ok(Prepared {
            analysis_output,
            action_map,
        })
    }

    fn create_workspace(&self) -> Result<TempDir, ValidationError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("gencheck-");
        let result = match &self.config.retention.work_root {
            Some(root) => fs::create_dir_all(root).and_then(|()| builder.tempdir_in(root)),
            None => builder.tempdir(),
        };
        result.map_err(|source| ValidationError::Workspace { source })
    }
}
