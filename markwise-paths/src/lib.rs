//! Config file locations for markwise.
//!
//! User-level files follow XDG on every platform, the same layout tools
//! like gh and kubectl use. Project-level files live in `.markwise/` under
//! the working directory unless `MARKWISE_PROJECT_CONFIG_DIR` points
//! elsewhere.

use std::path::PathBuf;

/// Environment variable overriding the project config directory.
pub const PROJECT_CONFIG_DIR_ENV: &str = "MARKWISE_PROJECT_CONFIG_DIR";

/// Name of the config file in both locations.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User config directory.
///
/// Returns `$XDG_CONFIG_HOME/markwise` if set, otherwise `~/.config/markwise`.
///
/// # Examples
///
/// ```
/// use markwise_paths::config_dir;
///
/// let config = config_dir();
/// assert!(config.ends_with("markwise"));
/// ```
pub fn config_dir() -> PathBuf {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config).join("markwise"),
        _ => match dirs::home_dir() {
            Some(home) => home.join(".config/markwise"),
            None => PathBuf::from(".config/markwise"),
        },
    }
}

/// User config file, `config_dir()/config.toml`.
pub fn user_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Project config directory: `$MARKWISE_PROJECT_CONFIG_DIR` or `./.markwise`.
pub fn project_config_dir() -> PathBuf {
    match std::env::var(PROJECT_CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(".markwise"),
    }
}

/// Project config file, `project_config_dir()/config.toml`.
pub fn project_config_file() -> PathBuf {
    project_config_dir().join(CONFIG_FILE_NAME)
}
