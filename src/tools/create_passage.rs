use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::memory_api::{encode_segment, ServerContext};
use crate::core::error::ToolError;
use crate::core::tool::{arg_text, flag, require_arg, Tool, ToolSpec};

/// Appends text to an agent's archival memory. The service may chunk the
/// text, so the response is always treated as a list of passages.
#[derive(Clone, Default)]
pub struct CreatePassageTool;

impl ToolSpec for CreatePassageTool {
    fn name(&self) -> &'static str {
        "create_passage"
    }
    fn description(&self) -> &'static str {
        "Insert a memory into an agent's archival memory store."
    }
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": {
                    "type": "string",
                    "description": "ID of the agent to add the passage to"
                },
                "text": {
                    "type": "string",
                    "description": "Text content to write to archival memory."
                },
                "include_embeddings": {
                    "type": "boolean",
                    "description": "Whether to include the full embedding vectors in the response (default: false).",
                    "default": false
                }
            },
            "required": ["agent_id", "text"]
        })
    }
}

#[async_trait]
impl Tool for CreatePassageTool {
    async fn call(&self, ctx: &dyn ServerContext, args: &Value) -> Result<Value, ToolError> {
        let agent_id = arg_text(require_arg(args, "agent_id")?);
        let text = require_arg(args, "text")?;
        let include_embeddings = flag(args, "include_embeddings");

        let path = format!("/agents/{}/archival-memory", encode_segment(&agent_id));
        let created = ctx
            .post(&path, &json!({ "text": text }), ctx.api_headers())
            .await
            .map_err(|e| e.classify(&agent_id, true))?;

        let passages = if include_embeddings {
            created
        } else {
            strip_embeddings(created)
        };

        Ok(json!({
            "success": true,
            "message": format!("Passage created successfully for agent {agent_id}."),
            "passages": passages,
            "embeddings_included": include_embeddings,
        }))
    }
}

/// Drops `embedding` from every returned passage. A lone object body is
/// treated as a single passage so nothing leaks when upstream skips the list.
fn strip_embeddings(created: Value) -> Value {
    match created {
        Value::Array(items) => Value::Array(items.into_iter().map(strip_one).collect()),
        other => strip_one(other),
    }
}

fn strip_one(mut passage: Value) -> Value {
    if let Some(obj) = passage.as_object_mut() {
        obj.remove("embedding");
    }
    passage
}
