//! Hook registry: ordered before/after handler lists with in-order dispatch.
//!
//! Dispatch rules:
//! - Handlers run in registration order, each receiving the same payload.
//! - Return values never reorder, skip or short-circuit the chain.
//! - A handler error stops the chain and is returned unchanged.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use mutations_core::error::AppError;
use mutations_core::result::AppResult;

use super::definitions::{HookPayload, HookPhase, HookScope};

/// A hook observing payloads of type `P`.
pub trait HookHandler<P>: Send + Sync + fmt::Debug {
    /// Observes the payload. An error aborts the remaining hooks of this
    /// dispatch and fails the invocation.
    fn handle(&self, payload: &P) -> AppResult<()>;

    /// Identifier used in logs and for removal.
    fn hook_id(&self) -> &str;
}

/// Which list of a registry a hook is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPosition {
    /// Runs before the transport call or the body.
    Before,
    /// Runs after the transport call or the body.
    After,
}

impl fmt::Display for HookPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Registry of before and after hooks for one scope.
///
/// Registries are filled during setup and read during traffic. Adding a
/// hook while calls are in flight is allowed but the in-flight calls may or
/// may not see it.
pub struct HookRegistry<P> {
    /// Global or the owning mutation.
    scope: HookScope,
    /// Before hooks in registration order.
    befores: RwLock<Vec<Arc<dyn HookHandler<P>>>>,
    /// After hooks in registration order.
    afters: RwLock<Vec<Arc<dyn HookHandler<P>>>>,
}

impl<P: HookPayload> HookRegistry<P> {
    /// Creates an empty registry for `scope`.
    pub fn new(scope: HookScope) -> Self {
        Self {
            scope,
            befores: RwLock::new(Vec::new()),
            afters: RwLock::new(Vec::new()),
        }
    }

    /// Creates an empty global registry.
    pub fn global() -> Self {
        Self::new(HookScope::Global)
    }

    /// Appends a before hook.
    pub async fn add_before(&self, handler: Arc<dyn HookHandler<P>>) -> AppResult<()> {
        self.add(HookPosition::Before, handler).await
    }

    /// Appends an after hook.
    pub async fn add_after(&self, handler: Arc<dyn HookHandler<P>>) -> AppResult<()> {
        self.add(HookPosition::After, handler).await
    }

    async fn add(&self, position: HookPosition, handler: Arc<dyn HookHandler<P>>) -> AppResult<()> {
        let hook_id = handler.hook_id().to_string();
        if hook_id.trim().is_empty() {
            return Err(AppError::invalid_hook(format!(
                "Hooks registered on {} need a non-empty id",
                self.scope
            )));
        }

        self.list(position).write().await.push(handler);

        info!(
            scope = %self.scope,
            position = %position,
            hook_id = %hook_id,
            "Hook registered"
        );
        Ok(())
    }

    /// Removes every hook with `hook_id` from both lists.
    ///
    /// Returns `true` if anything was removed.
    pub async fn remove(&self, hook_id: &str) -> bool {
        let mut removed = false;
        for position in [HookPosition::Before, HookPosition::After] {
            let mut hooks = self.list(position).write().await;
            let before = hooks.len();
            hooks.retain(|h| h.hook_id() != hook_id);
            removed |= hooks.len() < before;
        }

        if removed {
            info!(scope = %self.scope, hook_id = %hook_id, "Hook removed");
        }
        removed
    }

    /// Runs every before hook in registration order.
    pub async fn execute_befores(&self, phase: HookPhase, payload: &P) -> AppResult<()> {
        self.execute(HookPosition::Before, phase, payload).await
    }

    /// Runs every after hook in registration order.
    pub async fn execute_afters(&self, phase: HookPhase, payload: &P) -> AppResult<()> {
        self.execute(HookPosition::After, phase, payload).await
    }

    async fn execute(&self, position: HookPosition, phase: HookPhase, payload: &P) -> AppResult<()> {
        // Snapshot so that hooks run without the lock held.
        let handlers: Vec<Arc<dyn HookHandler<P>>> = self.list(position).read().await.clone();

        if handlers.is_empty() {
            return Ok(());
        }

        debug!(
            scope = %self.scope,
            phase = %phase,
            mutation = %payload.descriptor().name(),
            failed = payload.error().is_some(),
            handler_count = handlers.len(),
            "Dispatching hooks"
        );

        for handler in &handlers {
            if let Err(err) = handler.handle(payload) {
                warn!(
                    scope = %self.scope,
                    phase = %phase,
                    mutation = %payload.descriptor().name(),
                    hook_id = %handler.hook_id(),
                    error = %err,
                    "Hook failed, aborting dispatch"
                );
                return Err(err);
            }
        }

        Ok(())
    }

    /// Returns the ids of the hooks at `position`, in dispatch order.
    pub async fn hook_ids(&self, position: HookPosition) -> Vec<String> {
        self.list(position)
            .read()
            .await
            .iter()
            .map(|h| h.hook_id().to_string())
            .collect()
    }

    /// Returns the number of hooks at `position`.
    pub async fn len(&self, position: HookPosition) -> usize {
        self.list(position).read().await.len()
    }

    /// Returns whether the registry holds no hooks at all.
    pub async fn is_empty(&self) -> bool {
        self.befores.read().await.is_empty() && self.afters.read().await.is_empty()
    }

    fn list(&self, position: HookPosition) -> &RwLock<Vec<Arc<dyn HookHandler<P>>>> {
        match position {
            HookPosition::Before => &self.befores,
            HookPosition::After => &self.afters,
        }
    }
}

impl<P> fmt::Debug for HookRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
