use axum::Json;
use serde_json::{json, Value as J};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::mcp::{
    err as rpc_err, ok as rpc_ok, parse_error, RpcReq, RpcResp, APPLICATION_ERROR, METHOD_NOT_FOUND,
};
use crate::tools::registry::ToolRegistry;

fn server_info() -> J {
    json!({
        "serverInfo": { "name": "agent-memory-gateway", "version": env!("CARGO_PKG_VERSION") },
        "capabilities": { "tools": {} }
    })
}

fn tools_list(reg: &ToolRegistry) -> J {
    json!({ "tools": reg.list() })
}

async fn call_tool(reg: &ToolRegistry, params: &J) -> Result<J, String> {
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or("missing tool name")?;
    let args = params.get("arguments").unwrap_or(&J::Null);
    let result = reg.call(name, args).await?;
    serde_json::to_value(result).map_err(|e| e.to_string())
}

pub async fn dispatch(reg: &ToolRegistry, req: RpcReq) -> RpcResp {
    let id = req.id;
    match req.method.as_str() {
        "initialize" => rpc_ok(id, server_info()),
        "shutdown" => rpc_ok(id, J::Null),
        "tools.list" | "tools/list" => rpc_ok(id, tools_list(reg)),
        "tools.call" | "tools/call" => match call_tool(reg, &req.params).await {
            Ok(out) => rpc_ok(id, out),
            Err(e) => {
                tracing::warn!(error = %e, "tools/call rejected");
                rpc_err(id, APPLICATION_ERROR, e, None)
            }
        },
        other => rpc_err(id, METHOD_NOT_FOUND, format!("unknown method: {other}"), None),
    }
}

// HTTP handler
pub async fn http(
    axum::extract::State(reg): axum::extract::State<ToolRegistry>,
    Json(req): Json<RpcReq>,
) -> Json<RpcResp> {
    tracing::debug!(method = %req.method, id = ?req.id, "HTTP handler invoked");
    let resp = dispatch(&reg, req).await;
    tracing::trace!(response = ?resp, "HTTP handler completed");
    Json(resp)
}

/// Newline-delimited JSON-RPC over any reader/writer pair (stdin/stdout in practice).
pub async fn serve_lines<R, W>(reg: ToolRegistry, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let resp = match serde_json::from_str::<RpcReq>(&line) {
            Ok(req) => dispatch(&reg, req).await,
            Err(e) => parse_error(format!("parse error: {e}")),
        };
        let mut s = serde_json::to_string(&resp)?;
        s.push('\n');
        writer.write_all(s.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

pub async fn stdio_loop(reg: ToolRegistry) -> anyhow::Result<()> {
    tracing::info!("mode=stdio");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve_lines(reg, stdin, tokio::io::stdout()).await
}
