//! Application configuration schemas.
//!
//! Configuration is deserialized through the `config` crate from optional
//! TOML files plus `MUTATIONS__*` environment variables. Every section has
//! defaults, so an empty source set yields a working configuration.

pub mod debug;
pub mod logging;
pub mod transport;

use serde::{Deserialize, Serialize};

use self::debug::DebugConfig;
use self::logging::LoggingConfig;
use self::transport::TransportConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Debug hook settings.
    #[serde(default)]
    pub debug: DebugConfig,
    /// Transport settings.
    #[serde(default)]
    pub transport: TransportConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, `config/{env}` and environment variables
    /// prefixed with `MUTATIONS` (e.g. `MUTATIONS__DEBUG__ENABLED=true`).
    /// Missing files are skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MUTATIONS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
