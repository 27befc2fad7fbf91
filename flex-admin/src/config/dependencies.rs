//! Dependency initialization and wiring for the admin tool.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::AdminError;
use flex_repository::{FlexConfig, FlexService, IndexConfig, OpenSearchProvider};

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry the connection at a fixed interval until it succeeds.
    Retry,
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Service bound to the connected OpenSearch provider.
    pub service: FlexService,
}

impl ConnectionMode {
    /// Parse connection mode from environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "fail-fast" if not set or invalid.
    pub fn from_env() -> Self {
        match env::var("OPENSEARCH_CONNECTION_MODE") {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'fail-fast'");
                Self::FailFast
            }),
            Err(_) => Self::FailFast,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Some(Self::FailFast),
            "retry" => Some(Self::Retry),
            _ => None,
        }
    }
}

impl Dependencies {
    /// Connect to OpenSearch and build the service.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: fail-fast)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AdminError)` - If initialization fails (only in fail-fast mode)
    pub async fn new(config: FlexConfig, index_config: IndexConfig) -> Result<Self, AdminError> {
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env::var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        info!(
            opensearch_url = %config.url,
            index = %config.index,
            connection_mode = ?connection_mode,
            retry_interval_secs = retry_interval,
            "Initializing dependencies"
        );

        let provider = Self::connect_to_opensearch(
            &config.url,
            index_config,
            connection_mode,
            Duration::from_secs(retry_interval),
        )
        .await?;

        info!("OpenSearch connection established");

        Ok(Self {
            service: FlexService::new(Arc::new(provider), config),
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, AdminError> {
        loop {
            match Self::try_connect_opensearch(url, index_config.clone()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AdminError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Create the provider and check the cluster answers.
    async fn try_connect_opensearch(
        url: &str,
        index_config: IndexConfig,
    ) -> Result<OpenSearchProvider, AdminError> {
        let provider = OpenSearchProvider::new(url, index_config).await?;
        provider.ping().await?;
        Ok(provider)
    }
}
