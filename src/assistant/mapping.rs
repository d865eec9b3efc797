use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::AssistantError;

/// `(Method:groundTruthParam=Method:implementationParam)` at the start of the input
static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\s*([^:=(),\s]+)\s*:\s*([^:=(),\s]+)\s*=\s*([^:=(),\s]+)\s*:\s*([^:=(),\s]+)\s*\)")
        .expect("Invalid regex pattern")
});

/// One ground-truth parameter and the implementation parameter it corresponds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPair {
    pub ground_truth_method: String,
    pub ground_truth_param: String,
    pub implementation_method: String,
    pub implementation_param: String,
}

/// Parameter correspondence in the `(A:b=C:d),(A:e=C:f)` form the analysis tool accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMapping {
    pairs: Vec<ParamPair>,
}

impl ParamMapping {
    pub fn pairs(&self) -> &[ParamPair] {
        &self.pairs
    }
}

impl FromStr for ParamMapping {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AssistantError::MalformedMapping(s.to_string());
        let mut rest = s.trim();
        let mut pairs = Vec::new();

        loop {
            let caps = PAIR.captures(rest).ok_or_else(malformed)?;
            pairs.push(ParamPair {
                ground_truth_method: caps[1].to_string(),
                ground_truth_param: caps[2].to_string(),
                implementation_method: caps[3].to_string(),
                implementation_param: caps[4].to_string(),
            });
            rest = rest[caps[0].len()..].trim_start();

            if rest.is_empty() {
                break;
            }
            rest = rest.strip_prefix(',').ok_or_else(malformed)?.trim_start();
        }

        Ok(Self { pairs })
    }
}

impl fmt::Display for ParamMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .pairs
            .iter()
            .map(|p| {
                format!(
                    "({}:{}={}:{})",
                    p.ground_truth_method,
                    p.ground_truth_param,
                    p.implementation_method,
                    p.implementation_param
                )
            })
            .collect();
        f.write_str(&rendered.join(","))
    }
}
