use serde_json::Value;
use thiserror::Error;

/// Failure of a single upstream call: either a non-2xx response or a
/// transport/decode error before any status was seen.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self { status: None, body: None, message: message.into() }
    }

    pub fn status(status: u16, body: Option<Value>) -> Self {
        let message = match &body {
            Some(b) => format!("upstream status {status}: {b}"),
            None => format!("upstream status {status}"),
        };
        Self { status: Some(status), body, message }
    }

    /// Map onto the tool taxonomy. 404 always means the agent is unknown;
    /// 422 is only lifted into `Validation` for tools that send a body.
    pub fn classify(self, agent_id: &str, map_validation: bool) -> ToolError {
        match self.status {
            Some(404) => ToolError::AgentNotFound(agent_id.to_owned()),
            Some(422) if map_validation => ToolError::Validation {
                agent_id: agent_id.to_owned(),
                detail: self.body.unwrap_or(Value::Null),
            },
            _ => ToolError::Api(self),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            body: None,
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Validation error creating passage for agent {agent_id}: {detail}")]
    Validation { agent_id: String, detail: Value },

    #[error("{0}")]
    Api(#[from] ApiError),
}
