use clap::Parser;

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_MAX_ATTEMPTS, ENV_MONTH_POLICY, ENV_PORT, ENV_REQUEST_TIMEOUT_SECS,
    ENV_RETRY_DELAY_MS, ENV_UPSTREAM_TIMEOUT_SECS, ENV_UPSTREAM_URL, ENV_USER_AGENT,
};
use crate::domain::pageviews::MonthPolicy;

#[derive(Parser)]
#[command(name = "pageviews")]
#[command(version, about = "Wikipedia top-pageviews aggregation API", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Upper bound in seconds for a whole range request
    #[arg(long, env = ENV_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: Option<u64>,

    /// Upstream top-articles base URL (dates are appended as /YYYY/MM/DD)
    #[arg(long, env = ENV_UPSTREAM_URL)]
    pub upstream_url: Option<String>,

    /// User-Agent header sent upstream
    #[arg(long, env = ENV_USER_AGENT)]
    pub user_agent: Option<String>,

    /// Attempts per day when the upstream rate-limits (HTTP 403)
    #[arg(long, env = ENV_MAX_ATTEMPTS)]
    pub max_attempts: Option<u32>,

    /// Delay in milliseconds between rate-limited attempts
    #[arg(long, env = ENV_RETRY_DELAY_MS)]
    pub retry_delay_ms: Option<u64>,

    /// Upstream request timeout in seconds
    #[arg(long, env = ENV_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: Option<u64>,

    /// How `duration=month` is resolved (rolling or calendar)
    #[arg(long, env = ENV_MONTH_POLICY, value_parser = parse_month_policy)]
    pub month_policy: Option<MonthPolicy>,
}

/// Parse month policy from CLI/env string
fn parse_month_policy(s: &str) -> Result<MonthPolicy, String> {
    match s.to_lowercase().as_str() {
        "rolling" => Ok(MonthPolicy::Rolling),
        "calendar" => Ok(MonthPolicy::Calendar),
        _ => Err(format!(
            "Invalid month policy '{}'. Valid options: rolling, calendar",
            s
        )),
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub upstream_url: Option<String>,
    pub user_agent: Option<String>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub upstream_timeout_secs: Option<u64>,
    pub month_policy: Option<MonthPolicy>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            request_timeout_secs: cli.request_timeout_secs,
            upstream_url: cli.upstream_url,
            user_agent: cli.user_agent,
            max_attempts: cli.max_attempts,
            retry_delay_ms: cli.retry_delay_ms,
            upstream_timeout_secs: cli.upstream_timeout_secs,
            month_policy: cli.month_policy,
        }
    }
}

/// Parse CLI arguments into config overrides
pub fn parse() -> CliConfig {
    Cli::parse().into()
}
