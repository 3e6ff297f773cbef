//! Client configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel::ChannelEndpoint;
use crate::prelude::*;

pub const DEFAULT_HOST: &str = "localhost:8000";
pub const DEFAULT_STATE_DIR: &str = ".arbitre";

/// Grading service location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host, port and optional path prefix of the API.
    #[serde(default = "default_host")]
    pub host: String,
    /// Talk to the service over https/wss.
    #[serde(default)]
    pub https: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub state: StateConfig,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_DIR)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            https: false,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    pub fn channel_endpoint(&self) -> ChannelEndpoint {
        ChannelEndpoint::new(self.server.host.clone(), self.server.https)
    }

    /// Base URL of the REST API.
    pub fn api_base_url(&self) -> String {
        let scheme = if self.server.https { "https" } else { "http" };
        format!("{scheme}://{}", self.server.host.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn deserialize() -> Result<()> {
        let content = r#"
            # arbitre client configuration
            [server]
            host = "arbitre.example.org"
            https = true

            [state]
            dir = "/home/student/.arbitre"
        "#;
        let config = ClientConfig::from_toml(content)?;
        assert_eq!(config.server.host, "arbitre.example.org");
        assert!(config.server.https);
        assert_eq!(config.state.dir, PathBuf::from("/home/student/.arbitre"));
        assert_eq!(config.api_base_url(), "https://arbitre.example.org");
        assert!(config.channel_endpoint().secure);
        Ok(())
    }

    #[test]
    pub fn empty_file_uses_defaults() -> Result<()> {
        let config = ClientConfig::from_toml("")?;
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url(), "http://localhost:8000");
        Ok(())
    }

    #[test]
    pub fn partial_server_section() -> Result<()> {
        let config = ClientConfig::from_toml("[server]\nhttps = true\n")?;
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert!(config.server.https);
        Ok(())
    }
}
