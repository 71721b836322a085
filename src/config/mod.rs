//! Client configuration: a TOML file layered with `IRITA_` environment
//! variables.

mod loader;

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub use loader::{get_default_config, load_configuration, write_config_to};

const DEFAULT_RPC_URI: &str = "http://localhost:26657";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The `[rpc]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcClientConfig {
    #[serde(default = "default_rpc_uri")]
    pub rpc_uri: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub project_key: Option<String>,
}

fn default_rpc_uri() -> String {
    DEFAULT_RPC_URI.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            rpc_uri: default_rpc_uri(),
            timeout_secs: default_timeout_secs(),
            project_key: None,
        }
    }
}

impl RpcClientConfig {
    /// Reads the `[rpc]` table, falling back to defaults when it is absent.
    pub fn from_config(cfg: &config::Config) -> Result<Self> {
        match cfg.get::<RpcClientConfig>("rpc") {
            Ok(rpc) => Ok(rpc),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e).context("Invalid [rpc] configuration"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// An empty key in the file means no key.
    pub fn project_key(&self) -> Option<&str> {
        self.project_key.as_deref().filter(|k| !k.is_empty())
    }
}
