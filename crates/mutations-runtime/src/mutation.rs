//! Mutation facade: one object per mutation that callers run and servers
//! bind a body to.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use mutations_core::result::AppResult;
use mutations_core::types::{CallOptions, MutationDescriptor, TransportContext};
use mutations_hooks::{CallPayload, ClosureHook, ExecutionPayload, HookRegistry, HookScope};

use crate::execution::body_fn;
use crate::invocation;
use crate::runtime::MutationRuntime;

/// A defined mutation with its own call and execution hooks.
///
/// Its hooks run after the runtime's global hooks of the same phase.
#[derive(Debug)]
pub struct Mutation {
    runtime: Arc<MutationRuntime>,
    descriptor: Arc<MutationDescriptor>,
    call_hooks: Arc<HookRegistry<CallPayload>>,
    execution_hooks: Arc<HookRegistry<ExecutionPayload>>,
}

impl Mutation {
    pub(crate) fn new(runtime: Arc<MutationRuntime>, descriptor: Arc<MutationDescriptor>) -> Self {
        let scope = HookScope::Instance(descriptor.name().to_string());
        Self {
            runtime,
            descriptor,
            call_hooks: Arc::new(HookRegistry::new(scope.clone())),
            execution_hooks: Arc::new(HookRegistry::new(scope)),
        }
    }

    /// The descriptor.
    pub fn descriptor(&self) -> &Arc<MutationDescriptor> {
        &self.descriptor
    }

    /// The mutation name.
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// This mutation's call hook registry.
    pub fn call_hooks(&self) -> &Arc<HookRegistry<CallPayload>> {
        &self.call_hooks
    }

    /// This mutation's execution hook registry.
    pub fn execution_hooks(&self) -> &Arc<HookRegistry<ExecutionPayload>> {
        &self.execution_hooks
    }

    /// Adds a before-call hook for this mutation only.
    pub async fn add_before_call<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&CallPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.call_hooks
            .add_before(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds an after-call hook for this mutation only.
    pub async fn add_after_call<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&CallPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.call_hooks
            .add_after(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds a before-execution hook for this mutation only.
    pub async fn add_before_execution<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&ExecutionPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.execution_hooks
            .add_before(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds an after-execution hook for this mutation only.
    pub async fn add_after_execution<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&ExecutionPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.execution_hooks
            .add_after(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Calls the mutation with default options.
    pub async fn run(&self, params: Value) -> AppResult<Value> {
        self.run_with(params, CallOptions::default()).await
    }

    /// Calls the mutation.
    ///
    /// `params` must be an object or null. Resolves with the body's result
    /// or fails with the error that reached the caller.
    pub async fn run_with(&self, params: Value, options: CallOptions) -> AppResult<Value> {
        invocation::invoke(
            self.runtime.transport().as_ref(),
            &[self.runtime.call_hooks().as_ref(), self.call_hooks.as_ref()],
            &self.descriptor,
            params,
            options,
        )
        .await
    }

    /// Binds the body that executes this mutation, replacing any body
    /// bound earlier through this object.
    pub async fn set_handler<F, Fut>(&self, body: F) -> AppResult<()>
    where
        F: Fn(TransportContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<Value>> + Send + 'static,
    {
        let scopes = vec![
            self.runtime.execution_hooks().clone(),
            self.execution_hooks.clone(),
        ];
        self.runtime
            .bind(self.descriptor.clone(), scopes, body_fn(body))
            .await
    }
}
