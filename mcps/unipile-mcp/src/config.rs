//! Configuration for unipile-mcp
//!
//! Loaded once at startup and immutable afterwards. Sources, in order:
//! 1. Command-line flags
//! 2. Environment variables (`UNIPILE_DSN`, `UNIPILE_API_KEY`,
//!    `UNIPILE_PAGE_MAX`, `UNIPILE_TIMEOUT_SECS`)
//! 3. Defaults for the optional values
//!
//! The DSN and API key have no defaults. Startup fails if either is missing.

use clap::Parser;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DSN_VAR: &str = "UNIPILE_DSN";
pub const API_KEY_VAR: &str = "UNIPILE_API_KEY";
pub const PAGE_MAX_VAR: &str = "UNIPILE_PAGE_MAX";
pub const TIMEOUT_VAR: &str = "UNIPILE_TIMEOUT_SECS";

/// Largest page Unipile returns for chat history
pub const DEFAULT_PAGE_MAX: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that stop the server from starting
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("{var} is invalid: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Unipile endpoint and API key
///
/// `Debug` prints neither the DSN nor the key.
#[derive(Clone)]
pub struct Credentials {
    dsn: String,
    base_url: Url,
    api_key: String,
}

impl Credentials {
    /// Validate a DSN (`host:port`, optionally with an `http(s)://` prefix)
    /// and an API key
    pub fn new(dsn: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let dsn = non_empty(DSN_VAR, Some(dsn.into()))?;
        let api_key = non_empty(API_KEY_VAR, Some(api_key.into()))?;
        let base_url = base_url(&dsn)?;

        Ok(Self {
            dsn,
            base_url,
            api_key,
        })
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Root URL all API paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("dsn", &"[MASKED]")
            .field("api_key", &"[MASKED]")
            .finish()
    }
}

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Upper bound on the page size sent to Unipile
    pub page_max: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Config {
    /// Assemble a config, applying defaults and validating every value
    pub fn build(
        dsn: Option<String>,
        api_key: Option<String>,
        page_max: Option<usize>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let credentials =
            Credentials::new(dsn.unwrap_or_default(), api_key.unwrap_or_default())?;

        let page_max = page_max.unwrap_or(DEFAULT_PAGE_MAX);
        if page_max == 0 {
            return Err(ConfigError::InvalidVar {
                var: PAGE_MAX_VAR,
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                var: TIMEOUT_VAR,
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            credentials,
            page_max,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: format!("unipile-mcp/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_max = lookup(PAGE_MAX_VAR)
            .map(|v| parse_number(PAGE_MAX_VAR, &v))
            .transpose()?;
        let timeout_secs = lookup(TIMEOUT_VAR)
            .map(|v| parse_number(TIMEOUT_VAR, &v))
            .transpose()?;

        Self::build(lookup(DSN_VAR), lookup(API_KEY_VAR), page_max, timeout_secs)
    }
}

/// Command-line interface for the `unipile-mcp` binary
///
/// Every flag falls back to its environment variable, so a container only
/// needs `-e UNIPILE_DSN=... -e UNIPILE_API_KEY=...`.
#[derive(Parser, Debug)]
#[command(name = "unipile-mcp")]
#[command(version, about = "MCP server for Unipile chat history")]
pub struct Args {
    /// Unipile DSN, e.g. api8.unipile.com:13851
    #[arg(long, env = DSN_VAR, hide_env_values = true)]
    pub dsn: Option<String>,

    /// Unipile API key
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum page size requested from Unipile (default: 100)
    #[arg(long, env = PAGE_MAX_VAR)]
    pub page_max: Option<usize>,

    /// Timeout for each Unipile request, in seconds (default: 30)
    #[arg(long, env = TIMEOUT_VAR)]
    pub timeout_secs: Option<u64>,
}

impl Args {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        Config::build(self.dsn, self.api_key, self.page_max, self.timeout_secs)
    }
}

fn non_empty(var: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        })
}

fn base_url(dsn: &str) -> Result<Url, ConfigError> {
    let raw = if dsn.starts_with("http://") || dsn.starts_with("https://") {
        dsn.to_string()
    } else {
        format!("https://{dsn}")
    };

    let invalid = |reason: String| ConfigError::InvalidVar {
        var: DSN_VAR,
        reason,
    };

    let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("no host".to_string()));
    }
    Ok(url)
}
