//! Action-map validation against ground truth
//!
//! Decides whether ground-truth scoring can go ahead for an implementation:
//! its action map must equal the one derived from the ground truth, it must
//! expose exactly one action, and when that action takes several parameters
//! an assistant has to pair them with the ground-truth parameter names.

use std::fmt;
use std::path::Path;

use super::layout::SolutionLayout;
use crate::analysis::{AnalysisError, AnalysisTool};
use crate::assistant::{request_param_mapping, CorrelationAssistant, ParamMapping};
use crate::ground_truth::GroundTruth;
use crate::models::{ActionMapInfo, ActionMapSummary};
use crate::sink::{Reporter, Stage};

/// Whether to build, and with what parameter mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionMapVerdict {
    Proceed {
        info: ActionMapInfo,
        /// Present only for single-action maps with more than one parameter
        param_mapping: Option<ParamMapping>,
    },
    Stop {
        info: Option<ActionMapInfo>,
        reason: StopReason,
    },
}

impl ActionMapVerdict {
    pub fn info(&self) -> Option<&ActionMapInfo> {
        match self {
            ActionMapVerdict::Proceed { info, .. } => Some(info),
            ActionMapVerdict::Stop { info, .. } => info.as_ref(),
        }
    }

    pub fn should_continue(&self) -> bool {
        matches!(self, ActionMapVerdict::Proceed { .. })
    }

    fn stop(info: Option<ActionMapInfo>, reason: StopReason) -> Self {
        ActionMapVerdict::Stop { info, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EmptyImplementationMap,
    Analysis(String),
    GroundTruth(String),
    InvalidImplementationMap(String),
    Mismatch,
    MultipleActions(usize),
    NoActions,
    ParamMappingUnavailable,
    ParamMappingFailed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EmptyImplementationMap => write!(f, "Empty implementation map"),
            StopReason::Analysis(output) => write!(f, "{output}"),
            StopReason::GroundTruth(msg) => write!(f, "YAML error: {msg}"),
            StopReason::InvalidImplementationMap(map) => {
                write!(f, "Invalid implementation map format: {map}")
            }
            StopReason::Mismatch => write!(f, "Action maps don't match"),
            StopReason::MultipleActions(n) => write!(
                f,
                "Implementation contains {n} actions. Only implementations with 1 action are supported for benchmarking."
            ),
            StopReason::NoActions => write!(f, "Implementation exposes no actions"),
            StopReason::ParamMappingUnavailable => write!(
                f,
                "Failed to generate parameter mapping: no correlation assistant configured"
            ),
            StopReason::ParamMappingFailed(msg) => {
                write!(f, "Failed to generate parameter mapping: {msg}")
            }
        }
    }
}

/// Compare the implementation's action map with `ground_truth`.
pub fn validate_action_map(
    analysis: &AnalysisTool<'_>,
    layout: &SolutionLayout,
    ground_truth: &Path,
    assistant: Option<&dyn CorrelationAssistant>,
    reporter: &dyn Reporter,
) -> ActionMapVerdict {
    let stage = Stage::ActionMap;
    let implementation_file = layout.implementation_file();

    let implementation_map = match analysis.action_map(&implementation_file) {
        Ok(map) => map,
        Err(AnalysisError::EmptyOutput { .. }) => {
            return ActionMapVerdict::stop(None, StopReason::EmptyImplementationMap)
        }
        Err(err) => {
            reporter.error(stage, &format!("Action map extraction failed: {err}"));
            return ActionMapVerdict::stop(None, StopReason::Analysis(err.diagnostic()));
        }
    };

    let ground_truth_map = match GroundTruth::load(ground_truth) {
        Ok(parsed) => parsed.summary().to_string(),
        Err(err) => {
            reporter.error(stage, &format!("Failed to read ground truth: {err}"));
            return ActionMapVerdict::stop(None, StopReason::GroundTruth(err.to_string()));
        }
    };

    let info = ActionMapInfo::new(implementation_map, ground_truth_map);
    reporter.info(
        stage,
        &format!(
            "Action map [# Actions(# Parameters)]:\n  Ground truth  : {}\n  Implementation: {}\n  Match?          {}",
            info.ground_truth,
            info.implementation,
            if info.matches { "✓" } else { "✗" }
        ),
    );

    if !info.matches {
        reporter.info(stage, "Action maps don't match - skipping benchmarking.");
        return ActionMapVerdict::stop(Some(info), StopReason::Mismatch);
    }

    let summary = match info.implementation.parse::<ActionMapSummary>() {
        Ok(summary) => summary,
        Err(err) => {
            reporter.error(stage, &err.to_string());
            let map = info.implementation.clone();
            return ActionMapVerdict::stop(Some(info), StopReason::InvalidImplementationMap(map));
        }
    };

    match summary.single_action_params() {
        None if summary.action_count > 1 => {
            let reason = StopReason::MultipleActions(summary.action_count);
            reporter.error(stage, &reason.to_string());
            ActionMapVerdict::stop(Some(info), reason)
        }
        None => {
            reporter.error(stage, &StopReason::NoActions.to_string());
            ActionMapVerdict::stop(Some(info), StopReason::NoActions)
        }
        Some(0 | 1) => {
            reporter.info(
                Stage::GroundTruthTests,
                "With at most 1 parameter for 1 action the ground truth parameter maps directly onto the implementation parameter.",
            );
            ActionMapVerdict::Proceed {
                info,
                param_mapping: None,
            }
        }
        Some(_) => {
            reporter.info(
                Stage::GroundTruthTests,
                "With >1 parameter for 1 action the ground truth parameters must be matched with the implementation parameters.",
            );
            match correlate(analysis, &implementation_file, ground_truth, assistant, reporter) {
                Ok(mapping) => ActionMapVerdict::Proceed {
                    info,
                    param_mapping: Some(mapping),
                },
                Err(reason) => ActionMapVerdict::stop(Some(info), reason),
            }
        }
    }
}

fn correlate(
    analysis: &AnalysisTool<'_>,
    implementation_file: &Path,
    ground_truth: &Path,
    assistant: Option<&dyn CorrelationAssistant>,
    reporter: &dyn Reporter,
) -> Result<ParamMapping, StopReason> {
    let stage = Stage::GroundTruthTests;
    let Some(assistant) = assistant else {
        reporter.error(stage, &StopReason::ParamMappingUnavailable.to_string());
        return Err(StopReason::ParamMappingUnavailable);
    };

    let report = analysis
        .correlation_report(implementation_file, ground_truth)
        .map_err(|err| {
            reporter.error(stage, &format!("Correlation report failed: {err}"));
            StopReason::ParamMappingFailed(err.diagnostic())
        })?;

    let mapping = request_param_mapping(assistant, &report).map_err(|err| {
        reporter.error(stage, &format!("Failed to generate parameter mapping: {err}"));
        StopReason::ParamMappingFailed(err.to_string())
    })?;

    reporter.info(stage, &format!("Generated parameter mapping: {mapping}"));
    Ok(mapping)
}
