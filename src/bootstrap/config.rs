//! # Configuration Loader
//!
//! Reads the TOML config file into [`AppConfig`]. Loading is pure: missing
//! keys take the serde defaults and nothing is validated here.
//!
//! Lookup order:
//! 1. `--config <path>` when given (the file must exist)
//! 2. `<config dir>/karaoke-sync/config.toml` when present
//! 3. built-in defaults
//!
//! `KARAOKE_STORE_URL` (also read from `.env`) overrides `store.base_url`.

use anyhow::Context;
use ks_core::config::AppConfig;
use std::path::{Path, PathBuf};

pub const STORE_URL_ENV: &str = "KARAOKE_STORE_URL";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML for
/// [`AppConfig`].
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Resolves the effective configuration for this process.
pub fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match explicit.or_else(default_config_path) {
        Some(path) if path.exists() => load_config(path)?,
        Some(path) => {
            anyhow::ensure!(
                is_default_path(&path),
                "Config file not found: {}",
                path.display()
            );
            AppConfig::default()
        }
        None => AppConfig::default(),
    };
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("karaoke-sync").join("config.toml"))
}

fn is_default_path(path: &Path) -> bool {
    default_config_path().as_deref() == Some(path)
}

fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(url) = lookup(STORE_URL_ENV).filter(|url| !url.trim().is_empty()) {
        config.store.base_url = url;
    }
    config
}
