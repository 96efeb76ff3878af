use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "agent-memory-gateway")]
#[command(about = "Agent memory tool gateway")]
#[command(version)]
pub struct Cli {
    /// Runs the gateway when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway (HTTP or stdio per MODE)
    Serve,
    /// Health check a running gateway
    Health {
        /// Gateway URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Invoke one tool against the configured memory API and print the result
    Call {
        /// Tool name, e.g. retrieve_agent
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server().await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "gateway exited");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Call { tool, args } => match call_tool(&tool, &args).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("❌ Call failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
    if !matches!(mode.as_str(), "server" | "stdio") {
        return Err(format!("Invalid MODE: {}. Must be 'server' or 'stdio'", mode).into());
    }

    if mode == "server" {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        if port == 0 {
            return Err("PORT cannot be 0".into());
        }
    }

    // Strict here: a broken file is an error, not a silent fallback.
    if let Ok(path) = std::env::var("MEMORY_GATEWAY_CONFIG") {
        if !path.trim().is_empty() {
            crate::infra::config::load_file(std::path::Path::new(&path))
                .map_err(|e| format!("Invalid config file {}: {}", path, e))?;
        }
    }

    let cfg = crate::infra::config::Config::from_env();
    if cfg.api.api_root().is_none() {
        return Err("LETTA_BASE_URL is not set".into());
    }

    Ok(())
}

/// Returns whether the tool reported success.
async fn call_tool(tool: &str, raw_args: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let args: serde_json::Value = serde_json::from_str(raw_args)?;
    let cfg = crate::infra::config::Config::from_env();
    let registry = crate::infra::boot::registry_from_config(&cfg);
    let result = registry.call(tool, &args).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(!result.is_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear() {
        for k in ["MODE", "PORT", "LETTA_BASE_URL", "MEMORY_GATEWAY_CONFIG"] {
            env::remove_var(k);
        }
    }

    #[tokio::test]
    async fn health_check_ok_and_error_paths() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| { when.method(GET).path("/healthz"); then.status(200).body("ok"); });
        assert!(health_check(&server.base_url()).await.is_ok());

        let bad = MockServer::start();
        bad.mock(|when, then| { when.method(GET).path("/healthz"); then.status(500); });
        assert!(health_check(&bad.base_url()).await.is_err());
    }

    #[test]
    #[serial]
    fn validate_config_valid() {
        clear();
        env::set_var("MODE", "server");
        env::set_var("PORT", "8080");
        env::set_var("LETTA_BASE_URL", "http://localhost:8283");

        assert!(validate_config().is_ok());
        clear();
    }

    #[test]
    #[serial]
    fn validate_config_invalid_mode() {
        clear();
        env::set_var("MODE", "invalid");

        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("Invalid MODE"));
        clear();
    }

    #[test]
    #[serial]
    fn validate_config_invalid_port() {
        clear();
        env::set_var("PORT", "0");

        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("PORT cannot be 0"));
        clear();
    }

    #[test]
    #[serial]
    fn validate_config_requires_base_url() {
        clear();
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("LETTA_BASE_URL"));
    }

    #[test]
    #[serial]
    fn validate_config_rejects_broken_file() {
        clear();
        let path = env::temp_dir().join("agent-memory-gateway-cli-bad.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        env::set_var("MEMORY_GATEWAY_CONFIG", &path);
        env::set_var("LETTA_BASE_URL", "http://localhost:8283");

        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("Invalid config file"));
        let _ = std::fs::remove_file(&path);
        clear();
    }

    #[tokio::test]
    #[serial]
    async fn call_runs_tool_against_configured_api() {
        use httpmock::prelude::*;
        clear();
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/v1/agents/a1");
            then.status(200).json_body(serde_json::json!({"id": "a1"}));
        });
        env::set_var("LETTA_BASE_URL", server.base_url());

        let code = run_commands(Commands::Call {
            tool: "retrieve_agent".into(),
            args: r#"{"agent_id":"a1"}"#.into(),
        })
        .await;
        m.assert();
        assert_eq!(code, ExitCode::SUCCESS);
        clear();
    }

    #[tokio::test]
    #[serial]
    async fn call_fails_on_tool_error_or_bad_args() {
        clear();
        let code = run_commands(Commands::Call { tool: "retrieve_agent".into(), args: "{}".into() }).await;
        assert_eq!(code, ExitCode::FAILURE);

        let code = run_commands(Commands::Call { tool: "retrieve_agent".into(), args: "nope".into() }).await;
        assert_eq!(code, ExitCode::FAILURE);

        let code = run_commands(Commands::Call { tool: "unknown".into(), args: "{}".into() }).await;
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_failure() {
        clear();
        env::set_var("MODE", "nope");
        let code = run_commands(Commands::Config { validate: true }).await;
        assert_eq!(code, ExitCode::FAILURE);
        clear();
    }
}
