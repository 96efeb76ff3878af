use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::memory_api::ServerContext;
use crate::core::content::ToolResult;
use crate::core::error::ToolError;

/// Static descriptor the host uses for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool = Spec + one validate/call/reshape step against the shared context.
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, ctx: &dyn ServerContext, args: &Value) -> Result<Value, ToolError>;
}

/// Run a tool and fold its outcome into the result envelope. Nothing escapes.
pub async fn invoke(tool: &dyn Tool, ctx: &dyn ServerContext, args: &Value) -> ToolResult {
    tracing::debug!(tool = tool.name(), "tool invoked");
    match tool.call(ctx, args).await {
        Ok(payload) => ToolResult::json(&payload),
        Err(e) => {
            tracing::warn!(tool = tool.name(), error = %e, "tool failed");
            ToolResult::error(e)
        }
    }
}

/// Required argument: absent, `null`, `false`, `0` and `""` all count as missing.
pub fn require_arg<'a>(args: &'a Value, name: &'static str) -> Result<&'a Value, ToolError> {
    match args.get(name) {
        Some(v) if is_truthy(v) => Ok(v),
        _ => Err(ToolError::MissingArgument(name)),
    }
}

/// Optional flag, `false` unless truthy.
pub fn flag(args: &Value, name: &str) -> bool {
    args.get(name).is_some_and(is_truthy)
}

/// Strings verbatim, anything else as its JSON text.
pub fn arg_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
