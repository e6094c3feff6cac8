//! Debug hook configuration.

use serde::{Deserialize, Serialize};

/// Controls the built-in debug hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Whether the debug hooks log calls and executions.
    #[serde(default)]
    pub enabled: bool,
}
