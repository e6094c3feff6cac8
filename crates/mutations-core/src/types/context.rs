//! Transport context and per-call options.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle supplied by the transport to the executing side of a call.
///
/// The hook engine never inspects it; it is forwarded to hooks and to the
/// mutation body as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportContext {
    /// Connection the call arrived on.
    pub connection_id: Uuid,
    /// The calling user, if the transport knows it.
    pub user_id: Option<String>,
    /// When the transport received the call.
    pub received_at: DateTime<Utc>,
    /// Transport-specific extras.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TransportContext {
    /// Creates a context for a fresh connection.
    pub fn new() -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            user_id: None,
            received_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Sets the calling user.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Inserts a metadata value.
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

impl Default for TransportContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Options passed through the invocation wrapper to the transport.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Give up waiting for the reply after this long.
    pub timeout: Option<Duration>,
    /// Identity the transport should attach to the call.
    pub user_id: Option<String>,
    /// Transport-specific extras, copied into the [`TransportContext`].
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CallOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the calling user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Inserts a metadata value.
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}
