// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Pageviews";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "pageviews";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".pageviews";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "pageviews.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "PAGEVIEWS_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "PAGEVIEWS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "PAGEVIEWS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "PAGEVIEWS_LOG";

/// Environment variable for the per-request range timeout
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PAGEVIEWS_REQUEST_TIMEOUT_SECS";

// =============================================================================
// Environment Variables - Upstream
// =============================================================================

/// Environment variable for the upstream top-pageviews base URL
pub const ENV_UPSTREAM_URL: &str = "PAGEVIEWS_UPSTREAM_URL";

/// Environment variable for the upstream User-Agent header
pub const ENV_USER_AGENT: &str = "PAGEVIEWS_USER_AGENT";

/// Environment variable for maximum attempts per day on rate limiting
pub const ENV_MAX_ATTEMPTS: &str = "PAGEVIEWS_MAX_ATTEMPTS";

/// Environment variable for the delay between rate-limited attempts
pub const ENV_RETRY_DELAY_MS: &str = "PAGEVIEWS_RETRY_DELAY_MS";

/// Environment variable for the upstream request timeout
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "PAGEVIEWS_UPSTREAM_TIMEOUT_SECS";

// =============================================================================
// Environment Variables - Ranges
// =============================================================================

/// Environment variable selecting how `duration=month` is resolved
pub const ENV_MONTH_POLICY: &str = "PAGEVIEWS_MONTH_POLICY";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bound on a whole range request (all days, all retries)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Upstream Defaults
// =============================================================================

/// Wikimedia top-articles endpoint for English Wikipedia, all access types
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://wikimedia.org/api/rest_v1/metrics/pageviews/top/en.wikipedia/all-access";

/// Default User-Agent sent upstream (Wikimedia rejects anonymous clients)
pub const DEFAULT_USER_AGENT: &str = concat!("Pageviews/", env!("CARGO_PKG_VERSION"));

/// Attempts per day before giving up on a rate-limited upstream
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wait between rate-limited attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;

/// Upstream request timeout
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;
