use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::{
    DEFAULT_BASE_URL, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_PROVIDER,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_TTL_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
    GradingSection, MarkwiseConfig, ModelSection, RawGradingSection, RawMarkwiseConfig,
    RawModelSection, RawServerSection, ServerSection,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<MarkwiseConfig> {
        Self::load_from(&Self::user_config_path(), &Self::project_config_path())
    }

    /// Load and merge the given files; missing files are skipped
    pub fn load_from(user_path: &Path, project_path: &Path) -> Result<MarkwiseConfig> {
        let mut raw = RawMarkwiseConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_raw(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_raw(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        markwise_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with MARKWISE_PROJECT_CONFIG_DIR
    pub fn project_config_path() -> PathBuf {
        markwise_paths::project_config_file()
    }

    fn read_raw(path: &Path) -> Result<Option<RawMarkwiseConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawMarkwiseConfig, overlay: RawMarkwiseConfig) -> RawMarkwiseConfig {
        RawMarkwiseConfig {
            server: RawServerSection {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
            },
            model: RawModelSection {
                base_url: overlay.model.base_url.or(base.model.base_url),
                model: overlay.model.model.or(base.model.model),
                provider_name: overlay.model.provider_name.or(base.model.provider_name),
                request_timeout_secs: overlay
                    .model
                    .request_timeout_secs
                    .or(base.model.request_timeout_secs),
            },
            grading: RawGradingSection {
                retry_ttl_secs: overlay
                    .grading
                    .retry_ttl_secs
                    .or(base.grading.retry_ttl_secs),
                sweep_interval_secs: overlay
                    .grading
                    .sweep_interval_secs
                    .or(base.grading.sweep_interval_secs),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawMarkwiseConfig) -> MarkwiseConfig {
        MarkwiseConfig {
            server: ServerSection {
                host: raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: raw.server.port.unwrap_or(DEFAULT_PORT),
            },
            model: ModelSection {
                base_url: raw
                    .model
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: raw.model.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                provider_name: raw
                    .model
                    .provider_name
                    .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
                request_timeout_secs: raw
                    .model
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            grading: GradingSection {
                retry_ttl_secs: raw.grading.retry_ttl_secs.unwrap_or(DEFAULT_RETRY_TTL_SECS),
                sweep_interval_secs: raw
                    .grading
                    .sweep_interval_secs
                    .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from(
            &dir.path().join("user.toml"),
            &dir.path().join("project.toml"),
        )
        .unwrap();
        assert_eq!(config, MarkwiseConfig::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.toml",
            r#"
            [server]
            port = 9000
            host = "0.0.0.0"

            [model]
            model = "gpt-4o"
            "#,
        );
        let project = write(
            &dir,
            "project.toml",
            r#"
            [server]
            port = 9100

            [grading]
            retry_ttl_secs = 600
            "#,
        );

        let config = ConfigLoader::load_from(&user, &project).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.grading.retry_ttl_secs, 600);
        assert_eq!(config.grading.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let dir = TempDir::new().unwrap();
        let user = write(&dir, "user.toml", "[server\nport = ");

        let err = ConfigLoader::load_from(&user, &dir.path().join("none.toml")).unwrap_err();
        assert!(err.to_string().contains("user.toml"));
    }

    #[test]
    #[serial]
    fn test_project_path_env_override() {
        let dir = TempDir::new().unwrap();
        unsafe {
            std::env::set_var("MARKWISE_PROJECT_CONFIG_DIR", dir.path());
        }
        assert_eq!(
            ConfigLoader::project_config_path(),
            dir.path().join("config.toml")
        );
        unsafe {
            std::env::remove_var("MARKWISE_PROJECT_CONFIG_DIR");
        }
    }
}
