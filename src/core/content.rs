//! Tool result envelope returned to the host for every invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Either exactly one text block holding a JSON payload, or one text block
/// holding an error message with `isError` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn json(payload: &JsonValue) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        Self { content: vec![TextContent::text(text)], is_error: false }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![TextContent::text(format!("Error: {message}"))],
            is_error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }

    /// Parse the text block back into JSON. `None` for error envelopes.
    pub fn payload(&self) -> Option<JsonValue> {
        if self.is_error {
            return None;
        }
        serde_json::from_str(self.text()).ok()
    }
}

impl TextContent {
    fn text(text: String) -> Self {
        Self { kind: "text".into(), text }
    }
}
