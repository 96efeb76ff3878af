use std::net::SocketAddr;
use std::sync::Arc;

use crate::clients::memory_api::{MemoryApiClient, ServerContext};
use crate::infra::config::Config;
use crate::tools::registry::{build_registry, ToolRegistry};

pub fn registry_from_config(cfg: &Config) -> ToolRegistry {
    let ctx: Arc<dyn ServerContext> = Arc::new(MemoryApiClient::from_config(&cfg.api));
    build_registry(ctx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Stdio,
}

/// MODE is either `server` (HTTP) or `stdio`; anything else refuses to boot.
pub fn transport_for(mode: &str) -> anyhow::Result<Transport> {
    match mode {
        "server" => Ok(Transport::Http),
        "stdio" => Ok(Transport::Stdio),
        other => anyhow::bail!("Invalid MODE: {other}. Must be 'server' or 'stdio'"),
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    let transport = transport_for(&cfg.mode)?;
    let api_root = cfg.api.api_root().unwrap_or_else(|| "<unset>".into());
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        api_root = %api_root,
        "BOOT agent-memory-gateway"
    );

    let registry = registry_from_config(&cfg);

    // Stdio mode: JSON-RPC over stdin/stdout only, no HTTP listener.
    if transport == Transport::Stdio {
        return crate::api::mcp::stdio_loop(registry).await;
    }

    let app = crate::infra::http_app::build_app(registry);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn transport_follows_mode() {
        assert_eq!(transport_for("server").unwrap(), Transport::Http);
        assert_eq!(transport_for("stdio").unwrap(), Transport::Stdio);
    }

    #[test]
    fn unknown_mode_refuses_to_boot() {
        let err = transport_for("studio").unwrap_err();
        assert!(err.to_string().contains("Invalid MODE: studio"));
    }

    #[tokio::test]
    #[serial]
    async fn run_server_rejects_unknown_mode_before_binding() {
        std::env::set_var("MODE", "studio");
        let result = run_server().await;
        std::env::remove_var("MODE");
        assert!(result.unwrap_err().to_string().contains("Invalid MODE"));
    }

    #[test]
    #[serial]
    fn registry_builds_without_base_url() {
        std::env::remove_var("LETTA_BASE_URL");
        std::env::remove_var("MEMORY_GATEWAY_CONFIG");
        let reg = registry_from_config(&Config::from_env());
        assert_eq!(reg.list().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn unconfigured_registry_reports_errors_in_band() {
        std::env::remove_var("LETTA_BASE_URL");
        std::env::remove_var("MEMORY_GATEWAY_CONFIG");
        let reg = registry_from_config(&Config::from_env());
        let out = reg
            .call("retrieve_agent", &serde_json::json!({"agent_id": "a1"}))
            .await
            .unwrap();
        assert!(out.is_error());
        assert!(out.text().contains("LETTA_BASE_URL"));
    }
}
