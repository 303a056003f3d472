//! Server configuration
//!
//! Everything the binary needs beyond CLI flags comes from environment
//! variables, validated once at startup so a misconfigured server refuses
//! to boot instead of failing on the first request.

use std::env;

use thiserror::Error;
use tracing::warn;

/// Environment variable holding the shared dispatch secret.
pub const MCP_SECRET_ENV_VAR: &str = "STEPSTATS_MCP_SECRET";

/// Environment variable holding the step store base URL.
pub const STORE_URL_ENV_VAR: &str = "STEPSTATS_STORE_URL";

/// Environment variable holding the service key used for the step store and
/// the identity provider.
pub const STORE_KEY_ENV_VAR: &str = "STEPSTATS_STORE_KEY";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    /// A required variable is set but blank
    #[error("{0} must not be empty")]
    EmptyVar(&'static str),
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared secret gating the dispatch surface
    pub mcp_secret: String,
    /// Step store base URL, no trailing slash
    pub store_url: String,
    /// Service key presented to the store and the identity provider
    pub store_key: String,
}

impl ServerConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mcp_secret = require(&lookup, MCP_SECRET_ENV_VAR)?;
        if mcp_secret.len() < 32 {
            warn!(
                "{} is shorter than 32 characters; consider a longer secret",
                MCP_SECRET_ENV_VAR
            );
        }

        let store_url = require(&lookup, STORE_URL_ENV_VAR)?
            .trim_end_matches('/')
            .to_string();
        let store_key = require(&lookup, STORE_KEY_ENV_VAR)?;

        Ok(ServerConfig {
            mcp_secret,
            store_url,
            store_key,
        })
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    let value = lookup(name).ok_or(ConfigError::MissingVar(name))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::EmptyVar(name));
    }
    Ok(value)
}
