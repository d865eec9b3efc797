//! Ground-truth action specifications
//!
//! A ground-truth file is YAML with a top-level `actions` mapping. Each action
//! carries a `params` collection; names are kept for display only, the
//! pipeline itself only counts them.
//!
//! ```yaml
//! description: Raise a number to a power
//! actions:
//!   Power:
//!     params:
//!       base: { type: decimal }
//!       exponent: { type: decimal }
//! ```

use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::ActionMapSummary;

#[derive(Debug, thiserror::Error)]
pub enum GroundTruthError {
    #[error("failed to read ground truth {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid ground truth YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("ground truth has no `actions` mapping")]
    MissingActions,

    #[error("ground truth action {action:?} has no `params`")]
    MissingParams { action: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruthAction {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruth {
    pub description: Option<String>,
    pub actions: Vec<GroundTruthAction>,
}

impl GroundTruth {
    pub fn load(path: &Path) -> Result<Self, GroundTruthError> {
        let content = fs::read_to_string(path).map_err(|source| GroundTruthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, GroundTruthError> {
        let doc: Value = serde_yaml::from_str(content)?;

        let description = doc
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);

        let actions = doc
            .get("actions")
            .and_then(Value::as_mapping)
            .ok_or(GroundTruthError::MissingActions)?;

        let actions = actions
            .iter()
            .map(|(name, action)| {
                let name = value_to_string(name);
                let params = action
                    .get("params")
                    .ok_or_else(|| GroundTruthError::MissingParams {
                        action: name.clone(),
                    })?;
                Ok(GroundTruthAction {
                    params: param_names(params),
                    name,
                })
            })
            .collect::<Result<Vec<_>, GroundTruthError>>()?;

        Ok(Self {
            description,
            actions,
        })
    }

    /// Action map summary with parameter counts sorted ascending
    pub fn summary(&self) -> ActionMapSummary {
        ActionMapSummary::from_param_counts(self.actions.iter().map(|a| a.params.len()).collect())
    }
}

/// Names of a `params` value: mapping keys, sequence items, or none for `~`
fn param_names(params: &Value) -> Vec<String> {
    match params {
        Value::Mapping(map) => map.keys().map(value_to_string).collect(),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                // `- name: base` style entries
                Value::Mapping(m) if m.len() == 1 => m
                    .keys()
                    .next()
                    .map(value_to_string)
                    .unwrap_or_default(),
                other => value_to_string(other),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_string(other)],
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
