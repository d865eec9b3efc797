//! The aggregate result of one validation run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::{ActionMapInfo, BuildMetrics, TestResult};

/// The orchestrator state a run ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// No usable public class name could be extracted
    ClassNameUnresolved,
    /// Project scaffolding, a required package or the solution failed
    SetupFailed,
    /// The action map did not match ground truth, or could not be scored
    ActionMapRejected,
    /// The build ran and failed
    BuildFailed,
    /// The build succeeded and the test projects ran
    Tested,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::ClassNameUnresolved => write!(f, "class name unresolved"),
            Outcome::SetupFailed => write!(f, "setup failed"),
            Outcome::ActionMapRejected => write!(f, "action map rejected"),
            Outcome::BuildFailed => write!(f, "build failed"),
            Outcome::Tested => write!(f, "tested"),
        }
    }
}

/// Why a second generation attempt is warranted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionFeedback {
    BuildFailed { output: String },
    TestsFailed { output: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub outcome: Outcome,
    pub build_metrics: BuildMetrics,
    pub llm_test_results: Option<TestResult>,
    pub ground_truth_test_results: Option<TestResult>,
    /// Diagnostic text from the analysis tool or the failing toolchain step
    pub analysis_output: String,
    pub solution_dir: Option<PathBuf>,
    pub action_map_info: Option<ActionMapInfo>,
    /// Optional packages that could not be installed
    #[serde(default)]
    pub failed_packages: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ValidationReport {
    /// A report for a run that stopped before building
    pub fn terminal(
        outcome: Outcome,
        analysis_output: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            outcome,
            build_metrics: BuildMetrics::default(),
            llm_test_results: None,
            ground_truth_test_results: None,
            analysis_output: analysis_output.into(),
            solution_dir: None,
            action_map_info: None,
            failed_packages: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Build succeeded and every test run that happened passed
    pub fn is_success(&self) -> bool {
        self.build_metrics.success
            && self.llm_test_results.as_ref().is_some_and(TestResult::all_passed)
            && self
                .ground_truth_test_results
                .as_ref()
                .is_none_or(TestResult::all_passed)
    }

    /// Feedback for a reflection pass, if this attempt warrants one
    pub fn reflection_feedback(&self) -> Option<ReflectionFeedback> {
        if self.build_metrics.attempted() && !self.build_metrics.success {
            return Some(ReflectionFeedback::BuildFailed {
                output: self.build_metrics.raw_output.clone(),
            });
        }
        match &self.llm_test_results {
            Some(tests) if tests.failed > 0 => Some(ReflectionFeedback::TestsFailed {
                output: tests.raw_output.clone(),
            }),
            _ => None,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
