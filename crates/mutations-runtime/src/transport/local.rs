//! In-process transport for single-node deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use mutations_core::config::transport::TransportConfig;
use mutations_core::error::AppError;
use mutations_core::result::AppResult;
use mutations_core::traits::{MethodHandler, Transport};
use mutations_core::types::{CallOptions, TransportContext};

/// Transport that dispatches calls to handlers in the same process.
///
/// Every call runs on its own tokio task, the way a remote call would run
/// independently of the caller. A timeout stops the wait, not the task.
#[derive(Debug, Default)]
pub struct LocalTransport {
    /// Method name to handler.
    handlers: RwLock<HashMap<String, Arc<dyn MethodHandler>>>,
    /// Timeout applied when a call does not set one.
    default_timeout: Option<Duration>,
}

impl LocalTransport {
    /// Creates a transport without a default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport from configuration.
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            default_timeout: config.call_timeout(),
        }
    }

    /// Returns the registered method names, sorted.
    pub async fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn register_handler(
        &self,
        name: &str,
        handler: Arc<dyn MethodHandler>,
    ) -> AppResult<()> {
        let previous = self
            .handlers
            .write()
            .await
            .insert(name.to_string(), handler);

        if previous.is_some() {
            warn!(method = %name, "Replaced existing method handler");
        } else {
            info!(method = %name, "Method handler registered");
        }
        Ok(())
    }

    async fn invoke(&self, name: &str, params: Value, options: CallOptions) -> AppResult<Value> {
        let handler = self.handlers.read().await.get(name).cloned();
        let Some(handler) = handler else {
            return Err(AppError::not_found(format!("Method '{name}' not found")));
        };

        let mut context = TransportContext::new().with_user(options.user_id);
        context.metadata.extend(options.metadata);

        debug!(
            method = %name,
            connection_id = %context.connection_id,
            "Dispatching call"
        );

        let task = tokio::spawn(async move { handler.call(context, params).await });

        let joined = match options.timeout.or(self.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(method = %name, timeout_ms = limit.as_millis() as u64, "Call timed out");
                    return Err(AppError::timeout(format!(
                        "Method '{name}' did not reply within {}ms",
                        limit.as_millis()
                    )));
                }
            },
            None => task.await,
        };

        joined.map_err(|e| {
            error!(method = %name, error = %e, "Method handler task failed");
            AppError::transport(format!("Method '{name}' handler task failed: {e}"))
        })?
    }
}
