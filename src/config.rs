use crate::model::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub api_base: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_tool_rounds: usize,
    pub history_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com".into(),
            api_key: String::new(),
            timeout_seconds: 30,
            max_tool_rounds: 5,
            history_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    pub agent: AgentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.json"),
            bind_addr: "0.0.0.0:8000".into(),
            allowed_origins: vec!["http://localhost:3000".into()],
            agent: AgentConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bind_addr '{}': {}", self.bind_addr, e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_tool_rounds must be at least 1".into(),
            ));
        }
        if self.agent.api_key.is_empty() {
            warn!("No model API key configured; chat requests will be rejected by the model API");
        }
        Ok(())
    }

    /// Environment variables win over the file.
    fn apply_env(&mut self) {
        for key in ["GOOGLE_API_KEY", "GEMINI_API_KEY"] {
            if let Ok(value) = env::var(key) {
                if !value.is_empty() {
                    self.agent.api_key = value;
                    break;
                }
            }
        }
        if let Ok(path) = env::var("PRODUCT_DATA_PATH") {
            if !path.is_empty() {
                self.data_path = PathBuf::from(path);
            }
        }
    }
}

/// Reads the JSON config at `path`. A missing file means defaults.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => parse_config(path, &content)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Config {} not found, using defaults", path);
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_string(),
                source,
            });
        }
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn parse_config(path: &str, content: &str) -> Result<AppConfig, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}
