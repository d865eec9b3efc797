//! The generated-code validation pipeline
//!
//! [`Validator`] drives one validation run:
//!
//! 1. resolve the public class name with the analysis tool
//! 2. set up the projects and the solution ([`ProjectSetup`])
//! 3. with ground truth, check the action map ([`validate_action_map`])
//! 4. build ([`run_build`])
//! 5. run the test projects ([`run_tests`])
//! 6. apply the [`RetentionPolicy`]
//!
//! Each stage logs through the injected [`Reporter`](crate::sink::Reporter)
//! and reaches external programs only through a
//! [`CommandRunner`](crate::process::CommandRunner).

mod action_map;
mod build;
mod error;
mod layout;
mod orchestrator;
mod retention;
mod setup;
mod toolchain;

pub use action_map::{validate_action_map, ActionMapVerdict, StopReason};
pub use build::run_build;
pub use error::{SetupError, ValidationError};
pub use layout::{render_tree, SolutionLayout, GROUND_TRUTH_PROJECT, LLM_TESTS_PROJECT};
pub use orchestrator::Validator;
pub use retention::{replace_tree, RetentionDecision, RetentionPolicy};
pub use setup::ProjectSetup;
pub use test::{run_test_project, run_tests, TestRuns};
pub use toolchain::{Template, Toolchain};

/// Outcome of a stage that only runs under some condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageRun<T> {
    Skipped,
    Ran(T),
}

impl<T> StageRun<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StageRun::Skipped)
    }

    pub fn ran(self) -> Option<T> {
        match self {
            StageRun::Ran(value) => Some(value),
            StageRun::Skipped => None,
        }
    }
}
