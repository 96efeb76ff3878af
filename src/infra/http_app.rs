use axum::{
    routing::{get, post},
    Router,
};

use crate::tools::registry::ToolRegistry;

/// `/healthz` plus JSON-RPC tool dispatch at `/mcp`.
pub fn build_app(registry: ToolRegistry) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/mcp", post(crate::api::mcp::http))
        .with_state(registry)
}
