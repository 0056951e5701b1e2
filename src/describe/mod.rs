pub mod types;
pub mod rules;
pub mod prompt;
pub mod parser;
pub mod sanitize;
pub mod validate;
pub mod orchestrator;

pub use types::*;
pub use rules::*;
pub use prompt::*;
pub use parser::*;
pub use sanitize::*;
pub use validate::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("generator is not reachable at {0}")]
    GeneratorConnection(String),

    #[error("generator returned error (status {status}): {body}")]
    GeneratorHttp { status: u16, body: String },

    #[error("generator request timed out after {0}s")]
    GeneratorTimeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("model output unusable: {0}")]
    UnusableOutput(String),

    #[error("model files not found: {0}")]
    ModelNotFound(String),

    #[error("model init error: {0}")]
    ModelInit(String),

    #[error("inference error: {0}")]
    Inference(String),
}

impl DescribeError {
    /// Transport-level failures: the collaborator never produced text.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DescribeError::GeneratorConnection(_)
                | DescribeError::GeneratorHttp { .. }
                | DescribeError::GeneratorTimeout(_)
                | DescribeError::HttpClient(_)
        )
    }

    /// Content-level failures: the collaborator produced text we could not use.
    /// These are worth one re-attempt with a relaxed prompt.
    pub fn is_unusable_content(&self) -> bool {
        matches!(
            self,
            DescribeError::NoJsonFound
                | DescribeError::JsonParsing(_)
                | DescribeError::UnusableOutput(_)
        )
    }
}
