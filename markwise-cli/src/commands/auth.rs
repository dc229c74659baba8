//! Manage the model provider API key

use anyhow::{Result, bail};
use clap::Args;
use dialoguer::{Password, theme::ColorfulTheme};
use markwise_models::auth::{CredentialSource, CredentialStore, env_var_for_provider};

use super::KEYRING_SERVICE;
use crate::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Provider to configure (defaults to the configured provider)
    pub provider: Option<String>,

    /// Show where the key would be read from instead of storing one
    #[arg(long)]
    pub status: bool,
}

pub fn run(args: AuthArgs) -> Result<()> {
    let provider = match args.provider {
        Some(provider) => provider,
        None => ConfigLoader::load()?.model.provider_name,
    };
    let store = CredentialStore::new(KEYRING_SERVICE).with_env_fallback();

    if args.status {
        let source = match store.credential_source(&provider) {
            Some(CredentialSource::Keyring) => "keyring",
            Some(CredentialSource::Environment) => "environment",
            None => "not configured",
        };
        println!("{provider}: {source}");
        return Ok(());
    }

    let env_hint = env_var_for_provider(&provider)
        .map(|v| format!(" (or set {v})"))
        .unwrap_or_default();
    println!("Enter API key for {provider}{env_hint}");

    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API key")
        .interact()?;
    if key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    store.set(&provider, key.trim())?;
    println!("Credentials for '{provider}' saved to keyring.");
    Ok(())
}
