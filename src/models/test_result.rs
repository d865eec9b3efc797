use serde::{Deserialize, Serialize};

/// Results of one `test` run over a single test project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub duration_ms: u64,
    /// Lines carrying a failure marker; `None` when there were none
    pub error_details: Option<Vec<String>>,
    #[serde(default)]
    pub raw_output: String,
}

impl TestResult {
    /// A run that could not complete (timeout, launch failure)
    pub fn execution_failure(message: impl Into<String>) -> Self {
        Self {
            failed: 1,
            error_details: Some(vec![message.into()]),
            ..Self::default()
        }
    }

    pub fn total(&self) -> u32 {
        self.passed
            .saturating_add(self.failed)
            .saturating_add(self.skipped)
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
