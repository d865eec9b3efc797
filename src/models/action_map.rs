//! Action map summaries
//!
//! An action map condenses an implementation's exposed surface into
//! `"<action-count>(<param-count>, <param-count>, ...)"`, with parameter
//! counts sorted ascending so declaration order does not matter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action map summary: {0:?}")]
pub struct ActionMapParseError(pub String);

/// Parsed form of an action map string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMapSummary {
    pub action_count: usize,
    /// Parameter count per action, ascending
    pub param_counts: Vec<usize>,
}

impl ActionMapSummary {
    /// Build a summary from per-action parameter counts in any order
    pub fn from_param_counts(mut param_counts: Vec<usize>) -> Self {
        param_counts.sort_unstable();
        Self {
            action_count: param_counts.len(),
            param_counts,
        }
    }

    /// The parameter count of the only action, if there is exactly one
    pub fn single_action_params(&self) -> Option<usize> {
        match (self.action_count, self.param_counts.as_slice()) {
            (1, [params]) => Some(*params),
            _ => None,
        }
    }
}

impl fmt::Display for ActionMapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<String> = self.param_counts.iter().map(usize::to_string).collect();
        write!(f, "{}({})", self.action_count, counts.join(", "))
    }
}

impl FromStr for ActionMapSummary {
    type Err = ActionMapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ActionMapParseError(s.to_string());
        let trimmed = s.trim();

        let (actions, rest) = trimmed.split_once('(').ok_or_else(invalid)?;
        let action_count = actions.trim().parse::<usize>().map_err(|_| invalid())?;
        let params = rest.strip_suffix(')').ok_or_else(invalid)?;

        let param_counts = if params.trim().is_empty() {
            Vec::new()
        } else {
            params
                .split(',')
                .map(|p| p.trim().parse::<usize>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            action_count,
            param_counts,
        })
    }
}

/// Implementation and ground-truth action maps side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMapInfo {
    pub implementation: String,
    pub ground_truth: String,
    pub matches: bool,
}

impl ActionMapInfo {
    /// Compare two summaries by exact string equality
    pub fn new(implementation: impl Into<String>, ground_truth: impl Into<String>) -> Self {
        let implementation = implementation.into();
        let ground_truth = ground_truth.into();
        let matches = implementation == ground_truth;
        Self {
            implementation,
            ground_truth,
            matches,
        }
    }
}
