//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration, applying command-line overrides
//! - Build the route registry before anything is bound
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when the route table is valid)

use std::path::Path;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, RouterConfig};
use crate::routing::ConfigurationError;

/// Anything that stops the process from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route configuration error: {0}")]
    Routing(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(#[from] TryInitError),
}

/// Settings given on the command line; they win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Force development mode on.
    pub development_mode: bool,

    /// Replace the listener bind address.
    pub bind_address: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut RouterConfig) {
        if self.development_mode {
            config.site.development_mode = true;
        }
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
    }
}

/// Load the configuration file (or defaults) and apply overrides.
pub fn load_startup_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<RouterConfig, StartupError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load_startup_config(None, &Overrides::default()).unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let overrides = Overrides {
            development_mode: true,
            bind_address: Some("127.0.0.1:9000".into()),
        };
        let config = load_startup_config(None, &overrides).unwrap();
        assert!(config.site.development_mode);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");

        let overrides = Overrides {
            bind_address: Some("nowhere".into()),
            ..Overrides::default()
        };
        let err = load_startup_config(None, &overrides).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_startup_config(Some(Path::new("/nonexistent/urls.toml")), &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Io(_))));
    }
}
