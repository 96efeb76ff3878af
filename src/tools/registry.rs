use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::memory_api::ServerContext;
use crate::core::content::ToolResult;
use crate::core::tool::{invoke, Tool, ToolDefinition};
use crate::tools::{CreatePassageTool, RetrieveAgentTool};

/// Name → tool lookup plus the context every call runs against.
#[derive(Clone)]
pub struct ToolRegistry {
    by_name: HashMap<&'static str, Arc<dyn Tool>>,
    ctx: Arc<dyn ServerContext>,
}

impl ToolRegistry {
    pub fn new(ctx: Arc<dyn ServerContext>) -> Self {
        Self { by_name: HashMap::new(), ctx }
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        self.by_name.insert(tool.name(), tool);
    }

    /// Definitions sorted by name so listings are stable.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.by_name.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Only an unknown name is an `Err`; tool failures come back as error envelopes.
    pub async fn call(&self, name: &str, args: &serde_json::Value) -> Result<ToolResult, String> {
        let tool = self
            .by_name
            .get(name)
            .ok_or_else(|| format!("unknown tool: {name}"))?;
        Ok(invoke(tool.as_ref(), self.ctx.as_ref(), args).await)
    }
}

pub fn build_registry(ctx: Arc<dyn ServerContext>) -> ToolRegistry {
    let mut reg = ToolRegistry::new(ctx);
    reg.register(CreatePassageTool);
    reg.register(RetrieveAgentTool);
    reg
}
