//! Typed access to the code-analysis executable
//!
//! The analysis tool is an external program with a small flag-driven CLI:
//!
//! | Call | Result |
//! |---|---|
//! | `--classname <file>` | public class name on stdout |
//! | `--map <file>` | action map summary `N(p1, p2, ...)` on stdout |
//! | `--report <impl> <yaml>` | free-text parameter report on stdout |
//! | `<impl> <yaml> [--paramMap <mapping>]` | writes ground-truth tests into its working directory |

use regex::Regex;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use crate::assistant::ParamMapping;
use crate::process::{CommandRunner, Invocation, ProcessError, ProcessOutput};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex pattern"));

/// Which analysis-tool call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ClassName,
    ActionMap,
    Report,
    GenerateTests,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ClassName => write!(f, "--classname"),
            Capability::ActionMap => write!(f, "--map"),
            Capability::Report => write!(f, "--report"),
            Capability::GenerateTests => write!(f, "test generation"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("analysis tool {capability} failed: {output}")]
    Failed { capability: Capability, output: String },

    #[error("analysis tool {capability} returned no output")]
    EmptyOutput { capability: Capability },

    #[error("analysis tool returned an invalid class name: {0:?}")]
    InvalidClassName(String),

    #[error("failed to stage source for analysis: {0}")]
    TempFile(#[from] io::Error),
}

impl AnalysisError {
    /// Text to surface in the report
    pub fn diagnostic(&self) -> String {
        match self {
            AnalysisError::Failed { output, .. } => output.clone(),
            other => other.to_string(),
        }
    }
}

/// Handle on the analysis executable
pub struct AnalysisTool<'a> {
    program: &'a str,
    timeout: Duration,
    runner: &'a dyn CommandRunner,
}

impl<'a> AnalysisTool<'a> {
    pub fn new(program: &'a str, timeout: Duration, runner: &'a dyn CommandRunner) -> Self {
        Self {
            program,
            timeout,
            runner,
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(self.program).timeout(self.timeout)
    }

    /// Run and insist on a zero exit code
    fn run_checked(
        &self,
        invocation: Invocation,
        capability: Capability,
    ) -> Result<ProcessOutput, AnalysisError> {
        let output = self.runner.run(&invocation)?;
        if !output.success {
            return Err(AnalysisError::Failed {
                capability,
                output: output.diagnostic(),
            });
        }
        Ok(output)
    }

    /// Run and return trimmed, non-empty stdout
    fn run_for_stdout(
        &self,
        invocation: Invocation,
        capability: Capability,
    ) -> Result<String, AnalysisError> {
        let output = self.run_checked(invocation, capability)?;
        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            return Err(AnalysisError::EmptyOutput { capability });
        }
        Ok(stdout.to_string())
    }

    /// Public class name declared in `source`.
    ///
    /// The source is staged in a temporary `.cs` file that is removed again
    /// when this returns.
    pub fn class_name(&self, source: &str) -> Result<String, AnalysisError> {
        let mut file = tempfile::Builder::new()
            .prefix("gencheck-")
            .suffix(".cs")
            .tempfile()?;
        file.write_all(source.as_bytes())?;
        file.flush()?;

        self.class_name_of(file.path())
    }

    pub fn class_name_of(&self, source_file: &Path) -> Result<String, AnalysisError> {
        let invocation = self.invocation().arg("--classname").path_arg(source_file);
        let name = self.run_for_stdout(invocation, Capability::ClassName)?;

        if !IDENTIFIER.is_match(&name) {
            return Err(AnalysisError::InvalidClassName(name));
        }
        Ok(name)
    }

    /// Action map summary string for an implementation file
    pub fn action_map(&self, implementation_file: &Path) -> Result<String, AnalysisError> {
        let invocation = self.invocation().arg("--map").path_arg(implementation_file);
        self.run_for_stdout(invocation, Capability::ActionMap)
    }

    /// Parameter correlation report between an implementation and its ground truth
    pub fn correlation_report(
        &self,
        implementation_file: &Path,
        ground_truth: &Path,
    ) -> Result<String, AnalysisError> {
        let invocation = self
            .invocation()
            .arg("--report")
            .path_arg(implementation_file)
            .path_arg(ground_truth);
        self.run_for_stdout(invocation, Capability::Report)
    }

    /// Generate ground-truth tests into `output_dir`.
    ///
    /// Returns the tool's combined output on success.
    pub fn generate_tests(
        &self,
        implementation_file: &Path,
        ground_truth: &Path,
        param_mapping: Option<&ParamMapping>,
        output_dir: &Path,
    ) -> Result<String, AnalysisError> {
        let mut invocation = self
            .invocation()
            .path_arg(implementation_file)
            .path_arg(ground_truth)
            .current_dir(output_dir);
        if let Some(mapping) = param_mapping {
            invocation = invocation.arg("--paramMap").arg(mapping.to_string());
        }

        let output = self.runner.run(&invocation)?;
        if !output.success {
            return Err(AnalysisError::Failed {
                capability: Capability::GenerateTests,
                output: output.combined(),
            });
        }
        Ok(output.combined())
    }
}
