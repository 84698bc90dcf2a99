//! Configuration Loader
//!
//! Loads configuration from a TOML file, applies environment overrides, and
//! validates the result. Every field has a default, so an absent default
//! config file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::client::{QueryCacheConfig, QueryClientConfig, RetryPolicy};
use crate::adapters::coingecko::{
    CoinGeckoConfig, DEFAULT_COINGECKO_API_URL, DEFAULT_SIMPLE_PRICE_ENDPOINT, DEFAULT_TRENDING_ENDPOINT,
};
use crate::adapters::jupiter::{JupiterTokenListConfig, DEFAULT_TOKEN_LIST_URL};
use crate::adapters::raydium::{RaydiumConfig, DEFAULT_RAYDIUM_API_URL, DEFAULT_RAYDIUM_PRICE_ENDPOINT};
use crate::adapters::solana::{SolanaRpcConfig, DEFAULT_RPC_URL};
use crate::adapters::upstream::HttpConfig;

/// Config file used when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "config/tokenscope.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure matching tokenscope.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub upstream: UpstreamSection,
    pub cache: CacheSection,
    pub logging: LoggingSection,
    pub client: ClientSection,
}

/// Request API listener
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Upstream endpoints and HTTP behaviour
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpstreamSection {
    pub solana_rpc_url: String,
    pub jupiter_token_list_url: String,
    pub raydium_api_url: String,
    pub raydium_price_endpoint: String,
    pub coingecko_api_url: String,
    pub coingecko_trending_endpoint: String,
    pub coingecko_simple_price_endpoint: String,
    /// Delay before each CoinGecko simple-price request
    pub coingecko_request_spacing_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            solana_rpc_url: DEFAULT_RPC_URL.to_string(),
            jupiter_token_list_url: DEFAULT_TOKEN_LIST_URL.to_string(),
            raydium_api_url: DEFAULT_RAYDIUM_API_URL.to_string(),
            raydium_price_endpoint: DEFAULT_RAYDIUM_PRICE_ENDPOINT.to_string(),
            coingecko_api_url: DEFAULT_COINGECKO_API_URL.to_string(),
            coingecko_trending_endpoint: DEFAULT_TRENDING_ENDPOINT.to_string(),
            coingecko_simple_price_endpoint: DEFAULT_SIMPLE_PRICE_ENDPOINT.to_string(),
            coingecko_request_spacing_ms: 100,
            timeout_secs: 30,
            max_attempts: 2,
            retry_base_delay_ms: 500,
        }
    }
}

impl UpstreamSection {
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
            retry_base_delay_ms: self.retry_base_delay_ms,
        }
    }

    pub fn jupiter(&self) -> JupiterTokenListConfig {
        JupiterTokenListConfig {
            url: self.jupiter_token_list_url.clone(),
            http: self.http(),
        }
    }

    pub fn raydium(&self) -> RaydiumConfig {
        RaydiumConfig {
            api_url: self.raydium_api_url.clone(),
            price_endpoint: self.raydium_price_endpoint.clone(),
            http: self.http(),
        }
    }

    pub fn coingecko(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            api_url: self.coingecko_api_url.clone(),
            trending_endpoint: self.coingecko_trending_endpoint.clone(),
            simple_price_endpoint: self.coingecko_simple_price_endpoint.clone(),
            request_spacing: Duration::from_millis(self.coingecko_request_spacing_ms),
            http: self.http(),
        }
    }

    pub fn solana(&self) -> SolanaRpcConfig {
        SolanaRpcConfig {
            rpc_url: self.solana_rpc_url.clone(),
            http: self.http(),
        }
    }
}

/// Server-side caching
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Token directory TTL (milliseconds)
    pub directory_ttl_ms: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            directory_ttl_ms: 300_000,
        }
    }
}

impl CacheSection {
    pub fn directory_ttl(&self) -> Duration {
        Duration::from_millis(self.directory_ttl_ms)
    }
}

/// Logging configuration section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Settings for CLI commands that talk to a running API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub api_url: String,
    pub timeout_secs: u64,
    pub stale_time_secs: u64,
    pub gc_time_secs: u64,
    pub refetch_interval_secs: u64,
    /// Retries after the first attempt
    pub retries: u32,
    pub prefetch_debounce_ms: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 30,
            stale_time_secs: 60,
            gc_time_secs: 300,
            refetch_interval_secs: 60,
            retries: 2,
            prefetch_debounce_ms: 100,
        }
    }
}

impl ClientSection {
    pub fn query(&self) -> QueryClientConfig {
        QueryClientConfig {
            cache: QueryCacheConfig {
                stale_time: Duration::from_secs(self.stale_time_secs),
                gc_time: Duration::from_secs(self.gc_time_secs),
            },
            retry: RetryPolicy {
                retries: self.retries,
                ..RetryPolicy::default()
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refetch_interval(&self) -> Duration {
        Duration::from_secs(self.refetch_interval_secs)
    }

    pub fn prefetch_debounce(&self) -> Duration {
        Duration::from_millis(self.prefetch_debounce_ms)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    EnvError { var: String, value: String },

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration
///
/// An explicit `path` must exist. Without one, `DEFAULT_CONFIG_PATH` is used
/// when present and built-in defaults otherwise. Environment overrides are
/// applied before validation.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    config.apply_env_overrides(|var| std::env::var(var).ok())?;
    config.validate()?;
    Ok(config)
}

/// Expand `~` in a config path
pub fn expand_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let raw = path.as_ref().to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn parse_env<T: std::str::FromStr>(var: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvError {
        var: var.to_string(),
        value,
    })
}

fn check_url(name: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got {:?}",
            name, url
        )))
    }
}

impl Config {
    /// Parse a TOML file without env overrides or validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(expand_path(path))?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream = &mut self.upstream;
        let strings: [(&str, &mut String); 10] = [
            ("SOLANA_RPC_URL", &mut upstream.solana_rpc_url),
            ("JUPITER_TOKEN_LIST_URL", &mut upstream.jupiter_token_list_url),
            ("RAYDIUM_API_URL", &mut upstream.raydium_api_url),
            ("RAYDIUM_PRICE_ENDPOINT", &mut upstream.raydium_price_endpoint),
            ("COINGECKO_API_URL", &mut upstream.coingecko_api_url),
            ("COINGECKO_TRENDING_ENDPOINT", &mut upstream.coingecko_trending_endpoint),
            ("COINGECKO_SIMPLE_PRICE_ENDPOINT", &mut upstream.coingecko_simple_price_endpoint),
            ("LOG_LEVEL", &mut self.logging.level),
            ("TOKENSCOPE_HOST", &mut self.server.host),
            ("TOKENSCOPE_API_URL", &mut self.client.api_url),
        ];
        for (var, field) in strings {
            if let Some(value) = lookup(var) {
                *field = value;
            }
        }

        if let Some(value) = lookup("CACHE_DURATION") {
            self.cache.directory_ttl_ms = parse_env("CACHE_DURATION", value)?;
        }
        if let Some(value) = lookup("TOKENSCOPE_PORT") {
            self.server.port = parse_env("TOKENSCOPE_PORT", value)?;
        }
        Ok(())
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.directory_ttl_ms == 0 {
            return Err(ConfigError::ValidationError(
                "directory_ttl_ms must be > 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("port must be > 0".to_string()));
        }

        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be > 0".to_string(),
            ));
        }

        if self.client.stale_time_secs > self.client.gc_time_secs {
            return Err(ConfigError::ValidationError(format!(
                "stale_time_secs ({}) must not exceed gc_time_secs ({})",
                self.client.stale_time_secs, self.client.gc_time_secs
            )));
        }

        if self.client.refetch_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "refetch_interval_secs must be > 0".to_string(),
            ));
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }

        check_url("solana_rpc_url", &self.upstream.solana_rpc_url)?;
        check_url("jupiter_token_list_url", &self.upstream.jupiter_token_list_url)?;
        check_url("raydium_api_url", &self.upstream.raydium_api_url)?;
        check_url("coingecko_api_url", &self.upstream.coingecko_api_url)?;
        check_url("client.api_url", &self.client.api_url)?;

        Ok(())
    }

    /// Socket address string for the request API
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
