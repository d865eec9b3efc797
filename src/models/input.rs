use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assistant::CorrelationAssistant;

/// Everything one validation attempt needs, fixed at construction.
#[derive(Clone)]
pub struct ValidationInput {
    implementation_code: String,
    unit_test_code: String,
    packages: String,
    ground_truth: Option<PathBuf>,
    assistant: Option<Arc<dyn CorrelationAssistant>>,
}

impl ValidationInput {
    pub fn new(implementation_code: impl Into<String>, unit_test_code: impl Into<String>) -> Self {
        Self {
            implementation_code: implementation_code.into(),
            unit_test_code: unit_test_code.into(),
            packages: String::new(),
            ground_truth: None,
            assistant: None,
        }
    }

    /// Comma-separated third-party packages the implementation needs
    pub fn with_packages(mut self, packages: impl Into<String>) -> Self {
        self.packages = packages.into();
        self
    }

    pub fn with_ground_truth(mut self, path: impl Into<PathBuf>) -> Self {
        self.ground_truth = Some(path.into());
        self
    }

    pub fn with_assistant(mut self, assistant: Arc<dyn CorrelationAssistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn implementation_code(&self) -> &str {
        &self.implementation_code
    }

    pub fn unit_test_code(&self) -> &str {
        &self.unit_test_code
    }

    pub fn packages(&self) -> &str {
        &self.packages
    }

    pub fn ground_truth(&self) -> Option<&Path> {
        self.ground_truth.as_deref()
    }

    pub fn assistant(&self) -> Option<&dyn CorrelationAssistant> {
        self.assistant.as_deref()
    }

    /// The optional packages to install, see [`parse_package_list`]
    pub fn optional_packages(&self) -> Vec<String> {
        parse_package_list(&self.packages)
    }
}

impl fmt::Debug for ValidationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationInput")
            .field("implementation_code", &self.implementation_code.len())
            .field("unit_test_code", &self.unit_test_code.len())
            .field("packages", &self.packages)
            .field("ground_truth", &self.ground_truth)
            .field("assistant", &self.assistant.is_some())
            .finish()
    }
}

/// Split a comma-separated package list.
///
/// Entries are trimmed; empty entries, `none` and `moq` (always installed
/// into the test project) are dropped, case-insensitively.
pub fn parse_package_list(packages: &str) -> Vec<String> {
    packages
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| !p.eq_ignore_ascii_case("none") && !p.eq_ignore_ascii_case("moq"))
        .map(String::from)
        .collect()
}
