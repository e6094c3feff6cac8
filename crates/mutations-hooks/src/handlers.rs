//! Ready-made hook handlers built from closures.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::warn;

use mutations_core::error::AppError;
use mutations_core::result::AppResult;

use super::definitions::HookPayload;
use super::registry::HookHandler;

/// A synchronous hook backed by a closure.
pub struct ClosureHook<P> {
    /// Hook ID.
    id: String,
    /// Handler function.
    handler: Arc<dyn Fn(&P) -> AppResult<()> + Send + Sync>,
}

impl<P> ClosureHook<P> {
    /// Creates a new closure-based hook.
    pub fn new<F>(hook_id: &str, handler: F) -> Self
    where
        F: Fn(&P) -> AppResult<()> + Send + Sync + 'static,
    {
        Self {
            id: hook_id.to_string(),
            handler: Arc::new(handler),
        }
    }
}

impl<P> fmt::Debug for ClosureHook<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureHook")
            .field("id", &self.id)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl<P: HookPayload> HookHandler<P> for ClosureHook<P> {
    fn handle(&self, payload: &P) -> AppResult<()> {
        (self.handler)(payload)
    }

    fn hook_id(&self) -> &str {
        &self.id
    }
}

/// An asynchronous hook that is started but never awaited.
///
/// Each dispatch clones the payload and spawns the body on the current
/// tokio runtime. The dispatch itself succeeds as soon as the task is
/// spawned; errors from the body are logged, not propagated.
pub struct SpawnedHook<P> {
    /// Hook ID.
    id: String,
    /// Async handler function.
    handler: Arc<dyn Fn(P) -> BoxFuture<'static, AppResult<()>> + Send + Sync>,
    _payload: PhantomData<fn(P)>,
}

impl<P: 'static> SpawnedHook<P> {
    /// Creates a new fire-and-forget hook.
    pub fn new<F, Fut>(hook_id: &str, handler: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        Self {
            id: hook_id.to_string(),
            handler: Arc::new(move |payload: P| -> BoxFuture<'static, AppResult<()>> {
                Box::pin(handler(payload))
            }),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for SpawnedHook<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnedHook")
            .field("id", &self.id)
            .field("handler", &"<async closure>")
            .finish()
    }
}

impl<P> HookHandler<P> for SpawnedHook<P>
where
    P: HookPayload + Clone + 'static,
{
    fn handle(&self, payload: &P) -> AppResult<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            AppError::hook(format!("Hook '{}' needs a tokio runtime: {e}", self.id))
        })?;

        let fut = (self.handler)(payload.clone());
        let id = self.id.clone();
        runtime.spawn(async move {
            if let Err(err) = fut.await {
                warn!(hook_id = %id, error = %err, "Spawned hook failed");
            }
        });
        Ok(())
    }

    fn hook_id(&self) -> &str {
        &self.id
    }
}
