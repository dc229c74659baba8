use serde::{Deserialize, Serialize};

/// Default host for the markwise server
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port for the markwise server
pub const DEFAULT_PORT: u16 = 8040;
/// Default chat-completions base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model id
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default provider name, used for credential lookup
pub const DEFAULT_PROVIDER: &str = "openai";
/// Default request timeout for model calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default idle time after which retry state is forgotten
pub const DEFAULT_RETRY_TTL_SECS: u64 = 2 * 60 * 60;
/// Default retry sweep interval
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawMarkwiseConfig {
    #[serde(default)]
    pub server: RawServerSection,

    #[serde(default)]
    pub model: RawModelSection,

    #[serde(default)]
    pub grading: RawGradingSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawModelSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub provider_name: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawGradingSection {
    pub retry_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MarkwiseConfig {
    pub server: ServerSection,
    pub model: ModelSection,
    pub grading: GradingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Chat-completions endpoint used for grading.
///
/// API keys are never read from config files; they come from the keyring or
/// the provider's environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub base_url: String,
    pub model: String,
    pub provider_name: String,
    pub request_timeout_secs: u64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSection {
    pub retry_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for GradingSection {
    fn default() -> Self {
        Self {
            retry_ttl_secs: DEFAULT_RETRY_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}
