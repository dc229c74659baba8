pub mod auth;
pub mod config;
pub mod evaluate;
pub mod serve;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use markwise_core::{MemoryRetryStore, ModelClient};
use markwise_models::auth::CredentialStore;
use markwise_models::providers::{OpenAiCompatProvider, OpenAiConfig};
use markwise_server::AppState;
use tracing::{debug, warn};

use crate::config::MarkwiseConfig;

/// Keyring service under which provider API keys are stored
pub const KEYRING_SERVICE: &str = "markwise";

/// Build the model client described by `config`.
///
/// A missing API key is not fatal: local OpenAI-compatible servers accept
/// unauthenticated requests, and grading falls back to word overlap when the
/// provider rejects them.
pub fn model_client(config: &MarkwiseConfig) -> Result<ModelClient> {
    let section = &config.model;
    let mut provider_config = OpenAiConfig::new(&section.base_url)
        .with_timeout(Duration::from_secs(section.request_timeout_secs))
        .with_provider_name(&section.provider_name);

    let store = CredentialStore::new(KEYRING_SERVICE).with_env_fallback();
    match store.get(&section.provider_name) {
        Ok(key) => {
            debug!(provider = %section.provider_name, "Using stored API key");
            provider_config = provider_config.with_api_key(key);
        }
        Err(e) => warn!(
            provider = %section.provider_name,
            error = %e,
            "No API key found; requests will be unauthenticated"
        ),
    }

    let provider = OpenAiCompatProvider::new(provider_config)?;
    Ok(ModelClient::new(Arc::new(provider), &section.model))
}

/// Application state wired from config
pub fn app_state(config: &MarkwiseConfig) -> Result<AppState> {
    let client = model_client(config)?;
    let retries = Arc::new(MemoryRetryStore::new(Duration::from_secs(
        config.grading.retry_ttl_secs,
    )));
    Ok(AppState::with_model(client, retries))
}
