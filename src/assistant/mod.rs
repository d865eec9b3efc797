//! Parameter correlation through an assistant model
//!
//! When an implementation's single action takes several parameters, the
//! ground-truth parameter names have to be paired with the implementation's
//! parameter names before ground-truth tests can be generated. That pairing
//! is delegated to a chat model behind [`CorrelationAssistant`].

mod http;
mod mapping;

use serde::{Deserialize, Serialize};

pub use http::HttpAssistant;
pub use mapping::{ParamMapping, ParamPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("assistant returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("assistant returned no content")]
    EmptyResponse,

    #[error("assistant reply is not a parameter mapping: {0:?}")]
    MalformedMapping(String),

    #[error("no assistant configured: {0}")]
    Unavailable(String),
}

/// A chat model that answers with plain text.
pub trait CorrelationAssistant {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError>;
}

const MAPPING_INSTRUCTION: &str = "I will give you a C# method name and its parameters and a \
YAML method name and its parameters. Each YAML parameter should have a C# equivalent parameter. \
I want you to create a map of this one-to-one parameter equivalence in the exact format \
'(YAMLMethodName:YAMLParameter1=CSharpMethodName:CSharpParameter1),\
(YAMLMethodName:YAMLParameter2=CSharpMethodName:CSharpParameter2),...'";

const EXAMPLE_REPORT: &str = "\
C# method name: Power
C# parameters:
- baseNumber (double)
- exponent (double)

YAML method name: Power
YAML parameters:
- base
- exponent";

const EXAMPLE_MAPPING: &str = "(Power:base=Power:baseNumber),(Power:exponent=Power:exponent)";

/// One-shot prompt asking for a mapping of the parameters in `report`
pub fn mapping_prompt(report: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(MAPPING_INSTRUCTION),
        ChatMessage::user(EXAMPLE_REPORT),
        ChatMessage::assistant(EXAMPLE_MAPPING),
        ChatMessage::user(report),
    ]
}

/// Ask `assistant` to correlate the parameters described in `report`.
///
/// The reply must follow the `(A:b=C:d),...` grammar exactly.
pub fn request_param_mapping(
    assistant: &dyn CorrelationAssistant,
    report: &str,
) -> Result<ParamMapping, AssistantError> {
    let reply = assistant.complete(&mapping_prompt(report))?;
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    reply.parse()
}
