//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::domain::pageviews::{DayFetcher, RangeAggregator};
use crate::utils::time::{Clock, SystemClock};

pub struct CoreApp {
    pub config: AppConfig,
    pub shutdown: ShutdownService,
    pub aggregator: Arc<RangeAggregator>,
    pub clock: Arc<dyn Clock>,
}

impl CoreApp {
    pub async fn run() -> Result<()> {
        let _ = dotenvy::dotenv();
        Self::init_logging();

        let cli_config = cli::parse();
        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let fetcher = DayFetcher::new(&config.upstream, clock.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize upstream client: {}", e))?;
        let aggregator = Arc::new(RangeAggregator::new(Arc::new(fetcher)));

        tracing::debug!(upstream = %config.upstream.base_url, "Upstream client initialized");

        Ok(Self {
            config,
            shutdown: ShutdownService::new(),
            aggregator,
            clock,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}_server=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(&app.config);

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
