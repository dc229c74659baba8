//! markwise-server - HTTP API for quiz answer grading
//!
//! This crate owns the shared [`AppState`] (grader, retry store, integrity
//! log), serves the assessment routes, and runs the background sweeper that
//! expires idle retry state.

mod error;
pub mod http;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use markwise_core::RetryStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub use error::{ApiError, ErrorResponse, ServerError};
pub use http::create_router;
pub use state::AppState;

/// The markwise HTTP server
pub struct MarkwiseServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl MarkwiseServer {
    /// Create a server around prepared state
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self::with_state(config, Arc::new(state))
    }

    /// Create a server sharing state with the caller (for testing)
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared application state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        self.run_with_listener(listener).await
    }

    /// Run the server on an already bound listener
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let local = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("markwise server listening on {}", local);

        let sweeper = spawn_retry_sweeper(Arc::clone(&self.state.retries), self.config.sweep_interval);

        let router = create_router(self.state);
        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| ServerError::Internal(e.to_string()));

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        served
    }
}

/// Periodically evict idle retry entries.
///
/// Returns `None` when `period` is zero, which disables sweeping.
pub fn spawn_retry_sweeper(
    retries: Arc<dyn RetryStore>,
    period: Duration,
) -> Option<JoinHandle<()>> {
    if period.is_zero() {
        tracing::warn!("Retry sweep interval is zero; idle retry state will not expire");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = retries.evict_expired().await;
            if evicted > 0 {
                tracing::debug!(evicted, "Retry sweep finished");
            }
        }
    }))
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// How often idle retry state is swept
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8040,
            sweep_interval: Duration::from_secs(300),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the retry sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Returns the socket address string (e.g., "127.0.0.1:8040")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
