use serde::{Deserialize, Serialize};

/// What a build produced.
///
/// The default value is the "not attempted" state: no diagnostics, not
/// successful, zero duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetrics {
    /// Distinct warning lines in first-seen order
    pub warnings: Vec<String>,
    /// Distinct error lines in first-seen order
    pub errors: Vec<String>,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default)]
    pub raw_output: String,
}

impl BuildMetrics {
    /// Metrics for a build that never produced toolchain output
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }

    /// Whether a build ran (or tried to run) at all
    pub fn attempted(&self) -> bool {
        *self != Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unattempted() {
        let metrics = BuildMetrics::default();
        assert!(!metrics.success);
        assert!(!metrics.attempted());
        assert_eq!(metrics.duration_ms, 0);
    }

    #[test]
    fn test_launch_failure_has_single_error() {
        let metrics = BuildMetrics::launch_failure("Build encountered an unexpected error: boom");
        assert!(!metrics.success);
        assert!(metrics.attempted());
        assert_eq!(metrics.errors, vec!["Build encountered an unexpected error: boom"]);
        assert_eq!(metrics.duration_ms, 0);
    }
}
