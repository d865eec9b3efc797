pub mod action_map;
pub mod build;
pub mod input;
pub mod report;
pub mod test_result;

pub use action_map::{ActionMapInfo, ActionMapParseError, ActionMapSummary};
pub use build::BuildMetrics;
pub use input::{parse_package_list, ValidationInput};
pub use report::{Outcome, ReflectionFeedback, ValidationReport};
pub use test_result::TestResult;
