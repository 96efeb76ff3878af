use serde::Deserialize;
use std::path::Path;

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub api: ApiConfig,
}

/// Upstream agent-memory API settings. File values are overridden by env.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: ApiConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        let file = match std::env::var("MEMORY_GATEWAY_CONFIG") {
            Ok(path) if !path.trim().is_empty() => load_file(Path::new(&path)).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "ignoring unreadable config file");
                FileConfig::default()
            }),
            _ => FileConfig::default(),
        };

        Self {
            mode,
            port,
            api: file.api.overlay_env(),
        }
    }
}

pub fn load_file(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

impl ApiConfig {
    fn overlay_env(mut self) -> Self {
        if let Some(v) = non_empty_env("LETTA_BASE_URL") {
            self.base_url = Some(v);
        }
        if let Some(v) = non_empty_env("LETTA_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = non_empty_env("LETTA_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.timeout_ms = Some(v);
        }
        if let Some(v) = non_empty_env("LETTA_CONNECT_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.connect_timeout_ms = Some(v);
        }
        self
    }

    /// Versioned API root, e.g. `http://host:8283/v1`.
    pub fn api_root(&self) -> Option<String> {
        let base = self.base_url.as_deref()?.trim().trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        if base.ends_with("/v1") {
            Some(base.to_owned())
        } else {
            Some(format!("{base}/v1"))
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
