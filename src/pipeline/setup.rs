//! Project setup
//!
//! Creates the implementation library, the LLM test project and (with
//! ground truth) the ground-truth test project, then groups them in a
//! solution. Required steps fail with a [`SetupError`]; optional packages and
//! ground-truth test generation are best effort.

use std::fs;
use std::path::Path;

use super::error::SetupError;
use super::layout::{render_tree, SolutionLayout};
use super::toolchain::{Template, Toolchain};
use crate::analysis::AnalysisTool;
use crate::assistant::ParamMapping;
use crate::process::ProcessOutput;
use crate::retry::RetryPolicy;
use crate::sink::{Reporter, Stage};

/// Files the project templates create that the generated code replaces
const LIBRARY_TEMPLATE_FILES: &[&str] = &["Class1.cs"];
const TEST_TEMPLATE_FILES: &[&str] = &["UnitTest1.cs", "GlobalUsings.cs"];

pub struct ProjectSetup<'a> {
    toolchain: &'a Toolchain<'a>,
    layout: &'a SolutionLayout,
    reporter: &'a dyn Reporter,
    retry: RetryPolicy,
}

impl<'a> ProjectSetup<'a> {
    pub fn new(
        toolchain: &'a Toolchain<'a>,
        layout: &'a SolutionLayout,
        reporter: &'a dyn Reporter,
    ) -> Self {
        let retry = RetryPolicy::once_after(toolchain.timeouts().scaffold_backoff());
        Self {
            toolchain,
            layout,
            reporter,
            retry,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Library project with the implementation source and the SDK packages
    pub fn create_implementation(
        &self,
        code: &str,
        required_packages: &[String],
    ) -> Result<(), SetupError> {
        let stage = Stage::Implementation;
        let dir = self.layout.implementation_dir();
        create_dir(&dir)?;

        self.reporter.info(
            stage,
            &format!(
                "Creating project '{}' in {}...",
                self.layout.class_name(),
                dir.display()
            ),
        );
        self.scaffold(Template::ClassLibrary, &dir, false, stage)?;
        remove_template_files(&dir, LIBRARY_TEMPLATE_FILES)?;

        let code_path = self.layout.implementation_file();
        fs::write(&code_path, code).map_err(|e| SetupError::write(&code_path, e))?;
        self.reporter
            .info(stage, &format!("Wrote code to {}", code_path.display()));

        for package in required_packages {
            self.install_required(&dir, package, stage)?;
        }
        Ok(())
    }

    /// Install optional packages into the library, returning the ones that failed
    pub fn install_optional_packages(&self, packages: &[String]) -> Vec<String> {
        let dir = self.layout.implementation_dir();
        let failed: Vec<String> = packages
            .iter()
            .filter(|package| !self.install_optional(&dir, package))
            .cloned()
            .collect();

        if !failed.is_empty() {
            self.reporter.warn(
                Stage::Packages,
                &format!(
                    "Some optional packages failed to install: {}",
                    failed.join(", ")
                ),
            );
        }
        failed
    }

    /// Test project for the generated unit tests
    pub fn create_llm_tests(&self, code: &str, packages: &[String]) -> Result<(), SetupError> {
        let stage = Stage::LlmTests;
        let dir = self.layout.llm_tests_dir();
        create_dir(&dir)?;

        self.reporter.info(stage, "Creating project...");
        self.scaffold(Template::XUnit, &dir, false, stage)?;
        remove_template_files(&dir, TEST_TEMPLATE_FILES)?;
        for package in packages {
            self.install_required(&dir, package, stage)?;
        }
        self.reference_implementation(&dir, stage)?;

        let test_path = self.layout.llm_tests_file();
        fs::write(&test_path, code).map_err(|e| SetupError::write(&test_path, e))?;
        self.reporter
            .info(stage, &format!("Wrote code to {}", test_path.display()));
        Ok(())
    }

    /// Empty test project the analysis tool generates ground-truth tests into
    pub fn create_ground_truth_project(&self, packages: &[String]) -> Result<(), SetupError> {
        let stage = Stage::GroundTruthTests;
        let dir = self.layout.ground_truth_dir();
        create_dir(&dir)?;

        self.reporter.info(stage, "Creating project...");
        self.scaffold(Template::XUnit, &dir, true, stage)?;
        remove_template_files(&dir, TEST_TEMPLATE_FILES)?;
        for package in packages {
            self.install_required(&dir, package, stage)?;
        }
        self.reference_implementation(&dir, stage)
    }

    /// Have the analysis tool write ground-truth tests.
    ///
    /// Never fails: the tool's output, or its error output, is returned as
    /// diagnostic text and the run carries on.
    pub fn generate_ground_truth_tests(
        &self,
        analysis: &AnalysisTool<'_>,
        ground_truth: &Path,
        param_mapping: Option<&ParamMapping>,
    ) -> String {
        let stage = Stage::GroundTruthTests;
        self.reporter.info(stage, "Running test generator...");

        match analysis.generate_tests(
            &self.layout.implementation_file(),
            ground_truth,
            param_mapping,
            &self.layout.ground_truth_dir(),
        ) {
            Ok(output) => {
                self.reporter
                    .info(stage, &format!("Test generator output:\n{}", output.trim()));
                let generated = self.layout.ground_truth_tests_file();
                if let Ok(code) = fs::read_to_string(&generated) {
                    self.reporter
                        .debug(stage, &format!("Generated code:\n{code}"));
                }
                output
            }
            Err(err) => {
                let output = err.diagnostic();
                self.reporter
                    .error(stage, &format!("Test generator failed: {output}"));
                output
            }
        }
    }

    /// Create the solution and add every project.
    ///
    /// Only creating the solution itself is fatal; a project that cannot be
    /// added is logged and left out.
    pub fn assemble_solution(&self, with_ground_truth: bool) -> Result<(), SetupError> {
        let stage = Stage::Solution;
        let root = self.layout.root();

        self.reporter.info(stage, "Creating overall solution...");
        let created = self
            .toolchain
            .new_solution(root)
            .map_err(|e| SetupError::Solution {
                output: e.to_string(),
            })?;
        if !created.success {
            return Err(SetupError::Solution {
                output: created.diagnostic(),
            });
        }

        let mut projects = vec![
            self.layout.implementation_project(),
            self.layout.llm_tests_project(),
        ];
        if with_ground_truth && self.layout.ground_truth_dir().is_dir() {
            projects.push(self.layout.ground_truth_project());
        }

        for project in &projects {
            let name = project
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.toolchain.add_to_solution(root, project) {
                Ok(output) if output.success => {
                    self.reporter
                        .info(stage, &format!("Added {name} to the solution"));
                }
                Ok(output) => {
                    self.reporter
                        .error(stage, &format!("Failed to add {name}: {}", output.diagnostic()));
                }
                Err(err) => {
                    self.reporter
                        .error(stage, &format!("Failed to add {name}: {err}"));
                }
            }
        }

        if let Ok(tree) = render_tree(root) {
            self.reporter
                .debug(stage, &format!("Final solution structure:\n{tree}"));
        }
        Ok(())
    }

    /// Scaffold with one retry; the retry gets the longer timeout
    fn scaffold(
        &self,
        template: Template,
        dir: &Path,
        restore: bool,
        stage: Stage,
    ) -> Result<(), SetupError> {
        let timeouts = self.toolchain.timeouts();
        self.retry
            .run(
                |attempt| {
                    let timeout = if attempt == 0 {
                        timeouts.scaffold()
                    } else {
                        timeouts.scaffold_retry()
                    };
                    let output = self
                        .toolchain
                        .new_project(template, dir, restore, timeout)
                        .map_err(|e| e.to_string())?;
                    checked(output)
                },
                |attempt, err| {
                    self.reporter.warn(
                        stage,
                        &format!("Attempt {} failed with: {err}", attempt + 1),
                    );
                },
            )
            .map_err(|output| SetupError::Scaffold {
                project: stage,
                output,
            })
    }

    fn install_required(&self, dir: &Path, package: &str, stage: Stage) -> Result<(), SetupError> {
        self.toolchain
            .add_package(dir, package)
            .map_err(|e| e.to_string())
            .and_then(checked)
            .map_err(|output| {
                self.reporter
                    .error(stage, &format!("Failed to install {package}:\n{output}"));
                SetupError::RequiredPackage {
                    package: package.to_string(),
                    output,
                }
            })?;
        self.reporter
            .info(stage, &format!("Installed package: {package}"));
        Ok(())
    }

    fn install_optional(&self, dir: &Path, package: &str) -> bool {
        let result = self
            .toolchain
            .add_package(dir, package)
            .map_err(|e| e.to_string())
            .and_then(checked);
        match result {
            Ok(()) => {
                self.reporter
                    .info(Stage::Packages, &format!("Installed package: {package}"));
                true
            }
            Err(output) => {
                self.reporter.warn(
                    Stage::Packages,
                    &format!("Failed to install {package}:\n{output}"),
                );
                false
            }
        }
    }

    fn reference_implementation(&self, dir: &Path, stage: Stage) -> Result<(), SetupError> {
        self.toolchain
            .add_reference(dir, &self.layout.implementation_project())
            .map_err(|e| e.to_string())
            .and_then(checked)
            .map_err(|output| SetupError::Reference {
                project: stage,
                output,
            })
    }
}

/// Ok for a zero exit, else the diagnostic text
fn checked(output: ProcessOutput) -> Result<(), String> {
    if output.success {
        Ok(())
    } else {
        Err(output.diagnostic())
    }
}

fn create_dir(dir: &Path) -> Result<(), SetupError> {
    fs::create_dir_all(dir).map_err(|e| SetupError::write(dir, e))
}

fn remove_template_files(dir: &Path, names: &[&str]) -> Result<(), SetupError> {
    for name in names {
        let path = dir.join(name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| SetupError::write(&path, e))?;
        }
    }
    Ok(())
}
