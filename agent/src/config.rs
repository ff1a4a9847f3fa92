//! Configuration loading
//!
//! The agent reads an optional TOML file, then applies command-line and
//! environment overrides on top. Values are fixed once the server starts.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Port the management panel expects agents on
pub const DEFAULT_PORT: u16 = 6969;

/// Shell used to interpret command lines
pub const DEFAULT_SHELL: &str = "bash";

const LOCAL_CONFIG_FILE: &str = "command-agent.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No shared secret configured (set shared_secret, --secret or COMMAND_AGENT_SECRET)")]
    MissingSecret,
}

/// Agent configuration (from command-agent.toml)
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Value the `Senha` header must carry
    #[serde(default)]
    pub shared_secret: String,

    /// Shell used to run commands
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shared_secret: String::new(),
            shell: default_shell(),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub listen: Option<SocketAddr>,
    pub shared_secret: Option<String>,
    pub shell: Option<String>,
}

impl AgentConfig {
    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective configuration.
    ///
    /// Search order for the file:
    /// 1. Explicit path (`--config` or `COMMAND_AGENT_CONFIG`)
    /// 2. `./command-agent.toml`
    /// 3. `$XDG_CONFIG_HOME/command-agent/config.toml`
    /// 4. Built-in defaults
    ///
    /// Overrides are applied last. An explicit file must exist and parse;
    /// files found by search that fail to parse are skipped with a warning.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match &overrides.config_path {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                Self::load_from_path(path)?
            }
            None => Self::search().unwrap_or_default(),
        };

        if let Some(listen) = overrides.listen {
            config.listen = listen;
        }
        if let Some(secret) = overrides.shared_secret {
            config.shared_secret = secret;
        }
        if let Some(shell) = overrides.shell {
            config.shell = shell;
        }

        config.validate()?;
        Ok(config)
    }

    fn search() -> Option<Self> {
        let mut config_paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("command-agent").join("config.toml"));
        }

        for path in config_paths {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return Some(config);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        tracing::debug!("No config file found, using defaults");
        None
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(())
    }
}
