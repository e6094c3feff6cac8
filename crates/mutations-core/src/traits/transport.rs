//! Transport abstraction: the RPC mechanism the hook engine wraps.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::context::{CallOptions, TransportContext};

/// Handler invoked by a transport when a call for its name arrives.
#[async_trait]
pub trait MethodHandler: Send + Sync + fmt::Debug {
    /// Handles one call, returning the result or the error to report
    /// back to the caller.
    async fn call(&self, context: TransportContext, params: Value) -> AppResult<Value>;
}

/// An RPC transport.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Associates `handler` with `name`. A later registration for the same
    /// name replaces the earlier one.
    async fn register_handler(&self, name: &str, handler: Arc<dyn MethodHandler>)
    -> AppResult<()>;

    /// Performs a call and waits for its outcome.
    ///
    /// Fails with `NotFound` when no handler is registered for `name`.
    async fn invoke(&self, name: &str, params: Value, options: CallOptions) -> AppResult<Value>;
}
