//! The build toolchain commands used by the pipeline

use std::path::Path;
use std::time::Duration;

use crate::config::{Timeouts, ToolchainConfig};
use crate::process::{CommandRunner, Invocation, ProcessError, ProcessOutput};

/// Project templates the pipeline scaffolds from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    ClassLibrary,
    XUnit,
}

impl Template {
    fn name(self) -> &'static str {
        match self {
            Template::ClassLibrary => "classlib",
            Template::XUnit => "xunit",
        }
    }
}

/// Typed front for the toolchain executable.
///
/// Every call runs in an explicit working directory with a bounded timeout.
/// Exit codes are left for the caller to interpret.
pub struct Toolchain<'a> {
    config: &'a ToolchainConfig,
    timeouts: &'a Timeouts,
    runner: &'a dyn CommandRunner,
}

impl<'a> Toolchain<'a> {
    pub fn new(
        config: &'a ToolchainConfig,
        timeouts: &'a Timeouts,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            timeouts,
            runner,
        }
    }

    pub fn timeouts(&self) -> &Timeouts {
        self.timeouts
    }

    fn run_in(
        &self,
        dir: &Path,
        timeout: Duration,
        args: impl IntoIterator<Item = String>,
    ) -> Result<ProcessOutput, ProcessError> {
        let invocation = Invocation::new(&self.config.program)
            .args(args)
            .current_dir(dir)
            .timeout(timeout);
        let output = self.runner.run(&invocation)?;
        tracing::debug!("{}", output.summary());
        Ok(output)
    }

    /// `new <template> --framework <tfm> [--no-restore]`
    pub fn new_project(
        &self,
        template: Template,
        dir: &Path,
        restore: bool,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let mut args = vec![
            "new".to_string(),
            template.name().to_string(),
            "--framework".to_string(),
            self.config.target_framework.clone(),
        ];
        if !restore {
            args.push("--no-restore".to_string());
        }
        self.run_in(dir, timeout, args)
    }

    pub fn add_package(&self, dir: &Path, package: &str) -> Result<ProcessOutput, ProcessError> {
        self.run_in(
            dir,
            self.timeouts.package(),
            ["add", "package", package].map(String::from),
        )
    }

    pub fn add_reference(&self, dir: &Path, project: &Path) -> Result<ProcessOutput, ProcessError> {
        self.run_in(
            dir,
            self.timeouts.reference(),
            [
                "add".to_string(),
                "reference".to_string(),
                project.display().to_string(),
            ],
        )
    }

    pub fn new_solution(&self, dir: &Path) -> Result<ProcessOutput, ProcessError> {
        self.run_in(
            dir,
            self.timeouts.solution(),
            ["new", "sln"].map(String::from),
        )
    }

    pub fn add_to_solution(&self, dir: &Path, project: &Path) -> Result<ProcessOutput, ProcessError> {
        self.run_in(
            dir,
            self.timeouts.solution(),
            [
                "sln".to_string(),
                "add".to_string(),
                project.display().to_string(),
            ],
        )
    }

    pub fn build(&self, dir: &Path) -> Result<ProcessOutput, ProcessError> {
        self.run_in(dir, self.timeouts.build(), self.config.build_args.clone())
    }

    pub fn test(&self, dir: &Path) -> Result<ProcessOutput, ProcessError> {
        self.run_in(dir, self.timeouts.test(), self.config.test_args.clone())
    }
}
