use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::memory_api::{encode_segment, ServerContext};
use crate::core::error::ToolError;
use crate::core::tool::{arg_text, require_arg, Tool, ToolSpec};

#[derive(Clone, Default)]
pub struct RetrieveAgentTool;

impl ToolSpec for RetrieveAgentTool {
    fn name(&self) -> &'static str {
        "retrieve_agent"
    }
    fn description(&self) -> &'static str {
        "Get the state of a specific agent by ID"
    }
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": {
                    "type": "string",
                    "description": "The ID of the agent to retrieve"
                }
            },
            "required": ["agent_id"]
        })
    }
}

#[async_trait]
impl Tool for RetrieveAgentTool {
    async fn call(&self, ctx: &dyn ServerContext, args: &Value) -> Result<Value, ToolError> {
        let agent_id = arg_text(require_arg(args, "agent_id")?);
        let path = format!("/agents/{}", encode_segment(&agent_id));
        let agent = ctx
            .get(&path, ctx.api_headers())
            .await
            .map_err(|e| e.classify(&agent_id, false))?;
        Ok(json!({ "success": true, "agent": agent }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::memory_api::tests::{NoNetwork, Recording};
    use crate::clients::memory_api::MemoryApiClient;
    use crate::core::tool::invoke;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn returns_agent_state_unmodified() {
        let state = json!({
            "id": "a1",
            "name": "helper",
            "memory": {"blocks": [{"label": "persona", "value": "kind"}]},
            "embedding_config": {"embedding_dim": 1536}
        });
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/v1/agents/a1");
            then.status(200).json_body(state.clone());
        });

        let ctx = MemoryApiClient::new(format!("{}/v1", server.base_url()));
        let out = invoke(&RetrieveAgentTool, &ctx, &json!({"agent_id": "a1"})).await;
        m.assert();
        let v = out.payload().expect("success payload");
        assert_eq!(v, json!({"success": true, "agent": state}));
    }

    #[tokio::test]
    async fn upstream_404_mentions_agent_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/agents/a1");
            then.status(404).json_body(json!({"detail": "missing"}));
        });

        let ctx = MemoryApiClient::new(format!("{}/v1", server.base_url()));
        let out = invoke(&RetrieveAgentTool, &ctx, &json!({"agent_id": "a1"})).await;
        assert!(out.is_error());
        let text = out.text().to_lowercase();
        assert!(text.contains("a1"));
        assert!(text.contains("not found"));
    }

    #[tokio::test]
    async fn upstream_422_stays_generic() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/agents/a1");
            then.status(422).json_body(json!({"detail": "bad id"}));
        });

        let ctx = MemoryApiClient::new(format!("{}/v1", server.base_url()));
        let err = RetrieveAgentTool.call(&ctx, &json!({"agent_id": "a1"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Api(ref e) if e.status == Some(422)));
    }

    #[tokio::test]
    async fn missing_agent_id_never_reaches_network() {
        let ctx = NoNetwork::default();
        let out = invoke(&RetrieveAgentTool, &ctx, &json!({})).await;
        assert!(out.is_error());
        assert!(out.text().contains("Missing required argument: agent_id"));
        assert_eq!(ctx.calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let ctx = NoNetwork::default();
        let out = invoke(&RetrieveAgentTool, &ctx, &json!({"agent_id": "a1"})).await;
        assert_eq!(out.text(), "Error: network disabled");
        assert_eq!(ctx.calls(), 1);
    }

    #[tokio::test]
    async fn gets_encoded_path() {
        let ctx = Recording::replying(json!({"id": "a 1"}));
        RetrieveAgentTool.call(&ctx, &json!({"agent_id": "a 1"})).await.unwrap();
        assert_eq!(ctx.seen(), vec![("GET".to_string(), "/agents/a%201".to_string(), None)]);
    }
}
