use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{HooklineError, Result};

/// Main configuration structure for Hookline
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Proxy service and upstream webhook configuration
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Chat client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from the first default
    /// location that exists, falling back to built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in default_config_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HooklineError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| HooklineError::Config(format!("Failed to parse config: {e}")))
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".hookline").join("config.toml")),
        dirs::config_dir().map(|c| c.join("hookline").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Proxy service and upstream webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Address to listen on (e.g., "127.0.0.1:3001")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Workflow webhook that receives chat envelopes
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    /// Run a cheap reachability probe before every webhook call
    #[serde(default = "default_probe_enabled")]
    pub probe_enabled: bool,
    /// Reachability probe target; defaults to the webhook's origin
    #[serde(default)]
    pub probe_url: Option<String>,
    /// Main webhook call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Reachability probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Reply substituted when the webhook answers with an empty body
    #[serde(default = "default_empty_reply")]
    pub empty_reply: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            webhook_url: default_webhook_url(),
            probe_enabled: default_probe_enabled(),
            probe_url: None,
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            empty_reply: default_empty_reply(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_webhook_url() -> String {
    "http://localhost:5678/webhook/chat-message".to_string()
}

fn default_probe_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_empty_reply() -> String {
    "Please repeat your question.".to_string()
}

/// Chat client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Hookline proxy chat endpoint; `None` talks to the webhook directly
    #[serde(default = "default_backend_url")]
    pub backend_url: Option<String>,
    /// Prefix for generated session ids
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,
    /// Message shown to the user whenever a send fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    /// Client-side request timeout in seconds
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            session_prefix: default_session_prefix(),
            fallback_message: default_fallback_message(),
            timeout_secs: default_client_timeout_secs(),
        }
    }
}

fn default_backend_url() -> Option<String> {
    Some("http://localhost:3001/api/chat".to_string())
}

fn default_session_prefix() -> String {
    "chat".to_string()
}

fn default_fallback_message() -> String {
    "Sorry, something went wrong while contacting the server.".to_string()
}

fn default_client_timeout_secs() -> u64 {
    90
}
