//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings applied by the in-process transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Timeout applied to calls that do not set one, in milliseconds.
    /// Unset means calls wait for the handler indefinitely.
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
}

impl TransportConfig {
    /// Returns the default call timeout, if any.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }
}
