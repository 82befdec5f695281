//! # Host Settings
//!
//! Where the headless host finds its checkout configuration.

use anyhow::Context;
use payments_core::CheckoutConfig;
use std::path::{Path, PathBuf};

/// Locations searched when no config path is given
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

/// Host settings
#[derive(Debug, Clone, Default)]
pub struct HostSettings {
    /// Explicit checkout config file
    pub config_path: Option<PathBuf>,
    /// Two-digit year used by the expiry check (defaults to today)
    pub current_year: Option<u32>,
}

impl HostSettings {
    /// Load from environment variables (`.env` honoured)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            config_path: std::env::var("BLOQUE_CHECKOUT_CONFIG").ok().map(PathBuf::from),
            current_year: std::env::var("BLOQUE_CHECKOUT_YEAR")
                .ok()
                .and_then(|y| y.parse().ok()),
        }
    }

    /// Builder: override the config path
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config_path = path;
        }
        self
    }

    /// Builder: override the current year
    pub fn with_current_year(mut self, year: Option<u32>) -> Self {
        if year.is_some() {
            self.current_year = year;
        }
        self
    }

    /// Resolve the checkout configuration
    pub fn checkout_config(&self) -> anyhow::Result<CheckoutConfig> {
        match &self.config_path {
            Some(path) => load_config_file(path),
            None => load_default_config(),
        }
    }
}

fn load_config_file(path: &Path) -> anyhow::Result<CheckoutConfig> {
    let config = CheckoutConfig::from_file(path)
        .with_context(|| format!("Failed to load checkout config from {}", path.display()))?;
    tracing::info!(
        "Loaded checkout config from {} ({} methods)",
        path.display(),
        config.effective_methods().len()
    );
    Ok(config)
}

fn load_default_config() -> anyhow::Result<CheckoutConfig> {
    for path in DEFAULT_CONFIG_PATHS {
        let path = Path::new(path);
        if path.exists() {
            return load_config_file(path);
        }
    }

    tracing::debug!("No checkout config found, using defaults");
    Ok(CheckoutConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_core::PaymentMethodType;
    use std::io::Write;

    #[test]
    fn test_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "availableMethods = [\"cash\"]").unwrap();

        let settings = HostSettings::default().with_config_path(Some(file.path().to_path_buf()));
        let config = settings.checkout_config().unwrap();
        assert_eq!(config.available_methods, vec![PaymentMethodType::Cash]);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let settings =
            HostSettings::default().with_config_path(Some(PathBuf::from("/nonexistent/checkout.toml")));
        let err = settings.checkout_config().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/checkout.toml"));
    }

    #[test]
    fn test_overrides_keep_existing_values() {
        let settings = HostSettings {
            config_path: Some(PathBuf::from("a.toml")),
            current_year: Some(25),
        }
        .with_config_path(None)
        .with_current_year(Some(30));

        assert_eq!(settings.config_path, Some(PathBuf::from("a.toml")));
        assert_eq!(settings.current_year, Some(30));
    }
}
