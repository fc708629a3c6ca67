use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::pageviews::MonthPolicy;
use crate::utils::file::expand_path;
use crate::utils::retry::RetryPolicy;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_MAX_ATTEMPTS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_MS, DEFAULT_UPSTREAM_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_URL, DEFAULT_USER_AGENT,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_secs: Option<u64>,
}

/// Upstream pageview service section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpstreamFileConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// Date range resolution section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RangeFileConfig {
    pub month_policy: Option<MonthPolicy>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub upstream: Option<UpstreamFileConfig>,
    pub range: Option<RangeFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
            if server.request_timeout_secs.is_some() {
                current.request_timeout_secs = server.request_timeout_secs;
            }
        }

        if let Some(upstream) = other.upstream {
            let current = self
                .upstream
                .get_or_insert_with(UpstreamFileConfig::default);
            if upstream.base_url.is_some() {
                tracing::trace!(base_url = ?upstream.base_url, "Merging upstream.base_url");
                current.base_url = upstream.base_url;
            }
            if upstream.user_agent.is_some() {
                current.user_agent = upstream.user_agent;
            }
            if upstream.max_attempts.is_some() {
                current.max_attempts = upstream.max_attempts;
            }
            if upstream.retry_delay_ms.is_some() {
                current.retry_delay_ms = upstream.retry_delay_ms;
            }
            if upstream.timeout_secs.is_some() {
                current.timeout_secs = upstream.timeout_secs;
            }
        }

        if let Some(range) = other.range {
            let current = self.range.get_or_insert_with(RangeFileConfig::default);
            if range.month_policy.is_some() {
                tracing::trace!(month_policy = ?range.month_policy, "Merging range.month_policy");
                current.month_policy = range.month_policy;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on one range request, across every day and retry
    pub request_timeout: Duration,
}

/// Upstream pageview service configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash; dates are appended as `/YYYY/MM/DD`
    pub base_url: String,
    pub user_agent: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Fixed-delay retry policy applied to rate-limited responses
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, self.retry_delay)
    }
}

/// Date range resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeConfig {
    pub month_policy: MonthPolicy,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub range: RangeConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.pageviews/pageviews.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_sources(file_config, cli)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn from_sources(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_upstream = file_config.upstream.unwrap_or_default();
        let file_range = file_config.range.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
            request_timeout: Duration::from_secs(
                cli.request_timeout_secs
                    .or(file_server.request_timeout_secs)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        };

        let base_url = cli
            .upstream_url
            .clone()
            .or(file_upstream.base_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let upstream = UpstreamConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: cli
                .user_agent
                .clone()
                .or(file_upstream.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            max_attempts: cli
                .max_attempts
                .or(file_upstream.max_attempts)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            retry_delay: Duration::from_millis(
                cli.retry_delay_ms
                    .or(file_upstream.retry_delay_ms)
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
            timeout: Duration::from_secs(
                cli.upstream_timeout_secs
                    .or(file_upstream.timeout_secs)
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
        };

        let range = RangeConfig {
            month_policy: cli
                .month_policy
                .or(file_range.month_policy)
                .unwrap_or_default(),
        };

        let config = Self {
            server,
            upstream,
            range,
        };
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            upstream = %config.upstream.base_url,
            month_policy = %config.range.month_policy,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.server.request_timeout.is_zero() {
            anyhow::bail!("Configuration error: server.request_timeout_secs must be greater than 0");
        }

        let url = reqwest::Url::parse(&self.upstream.base_url).with_context(|| {
            format!(
                "Configuration error: upstream.base_url is not a valid URL: {}",
                self.upstream.base_url
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Configuration error: upstream.base_url must use http or https (got '{}')",
                url.scheme()
            );
        }

        if self.upstream.user_agent.trim().is_empty() {
            anyhow::bail!("Configuration error: upstream.user_agent must not be empty");
        }

        if self.upstream.max_attempts == 0 {
            anyhow::bail!("Configuration error: upstream.max_attempts must be at least 1");
        }

        if self.upstream.timeout.is_zero() {
            anyhow::bail!("Configuration error: upstream.timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.pageviews/pageviews.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
