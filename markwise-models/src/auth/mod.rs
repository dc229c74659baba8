//! Credential management for provider API keys.
//!
//! Keys are looked up in the system keyring first and, when enabled, in the
//! provider's environment variable. Deployments usually rely on the
//! environment; developer machines can keep the key in the keyring.
//!
//! # Example
//!
//! ```ignore
//! use markwise_models::auth::CredentialStore;
//!
//! let store = CredentialStore::new("markwise").with_env_fallback();
//! let key = store.get("openai")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when building the Authorization header.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Environment variable names for each provider.
const ENV_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("openrouter", "OPENROUTER_API_KEY"),
    ("groq", "GROQ_API_KEY"),
    ("together", "TOGETHER_API_KEY"),
    ("mistral", "MISTRAL_API_KEY"),
];

/// Get the environment variable name for a provider.
pub fn env_var_for_provider(provider: &str) -> Option<&'static str> {
    ENV_VARS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, v)| *v)
}

/// Credential storage with system keyring and environment fallback.
///
/// Lookup order:
/// 1. System keyring (if available)
/// 2. Environment variables (if `env_fallback` is enabled)
pub struct CredentialStore {
    service_name: String,
    env_fallback: bool,
}

impl CredentialStore {
    /// Create a new credential store for the given keyring service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            env_fallback: false,
        }
    }

    /// Enable environment variable fallback.
    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// Get an API key for a provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if neither source has a key.
    pub fn get(&self, provider: &str) -> Result<ApiKey> {
        if let Some(key) = self.get_from_keyring(provider) {
            debug!(provider, "retrieved API key from keyring");
            return Ok(key);
        }

        if self.env_fallback
            && let Some(key) = self.get_from_env(provider)
        {
            debug!(provider, "retrieved API key from environment");
            return Ok(key);
        }

        Err(Error::CredentialsNotFound(provider.to_string()))
    }

    /// Store an API key for a provider in the system keyring.
    pub fn set(&self, provider: &str, key: &str) -> Result<()> {
        let entry = self.keyring_entry(provider)?;
        entry
            .set_password(key)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        debug!(provider, "stored API key in keyring");
        Ok(())
    }

    /// Where the key for `provider` would be read from, if anywhere.
    pub fn credential_source(&self, provider: &str) -> Option<CredentialSource> {
        if self.get_from_keyring(provider).is_some() {
            Some(CredentialSource::Keyring)
        } else if self.env_fallback && self.get_from_env(provider).is_some() {
            Some(CredentialSource::Environment)
        } else {
            None
        }
    }

    fn keyring_entry(&self, provider: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service_name, provider).map_err(|e| Error::Keyring(e.to_string()))
    }

    fn get_from_keyring(&self, provider: &str) -> Option<ApiKey> {
        let entry = self.keyring_entry(provider).ok()?;
        entry.get_password().ok().map(ApiKey::new)
    }

    fn get_from_env(&self, provider: &str) -> Option<ApiKey> {
        let env_var = env_var_for_provider(provider)?;
        env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| ApiKey::new(v.trim()))
    }
}

/// Source of a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Stored in system keyring.
    Keyring,
    /// From environment variable.
    Environment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret-key-12345");
        let debug = format!("{:?}", key);
        assert_eq!(debug, "ApiKey([REDACTED])");
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn api_key_from_string() {
        let key: ApiKey = "my-key".into();
        assert_eq!(key.expose_secret(), "my-key");

        let key: ApiKey = String::from("my-key").into();
        assert_eq!(key.expose_secret(), "my-key");
    }

    #[test]
    fn env_var_for_known_providers() {
        assert_eq!(env_var_for_provider("openai"), Some("OPENAI_API_KEY"));
        assert_eq!(env_var_for_provider("openrouter"), Some("OPENROUTER_API_KEY"));
        assert_eq!(env_var_for_provider("unknown"), None);
    }

    #[test]
    #[serial]
    fn credential_store_env_fallback_works() {
        // SAFETY: env-mutating tests are serialized
        unsafe { env::set_var("OPENROUTER_API_KEY", "  test-key-from-env \n") };

        let store = CredentialStore::new("markwise-test-nonexistent").with_env_fallback();
        let result = store.get("openrouter");
        let source = store.credential_source("openrouter");

        // SAFETY: env-mutating tests are serialized
        unsafe { env::remove_var("OPENROUTER_API_KEY") };

        assert_eq!(result.unwrap().expose_secret(), "test-key-from-env");
        assert_eq!(source, Some(CredentialSource::Environment));
    }

    #[test]
    #[serial]
    fn blank_env_var_is_ignored() {
        // SAFETY: env-mutating tests are serialized
        unsafe { env::set_var("GROQ_API_KEY", "   ") };

        let store = CredentialStore::new("markwise-test-nonexistent").with_env_fallback();
        let result = store.get("groq");

        // SAFETY: env-mutating tests are serialized
        unsafe { env::remove_var("GROQ_API_KEY") };

        assert!(matches!(result, Err(Error::CredentialsNotFound(_))));
    }

    #[test]
    fn credential_store_without_fallback_fails() {
        let store = CredentialStore::new("markwise-test-nonexistent");
        let result = store.get("unknown-provider");
        assert!(matches!(result, Err(Error::CredentialsNotFound(p)) if p == "unknown-provider"));
    }
}
