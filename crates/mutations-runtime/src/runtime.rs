//! Mutation runtime: owns the transport, the global hook registries and
//! the name to descriptor bindings.
//!
//! Build one runtime at process start, register global hooks and define
//! mutations during setup, then serve traffic. Tests build a fresh runtime
//! each, so no state leaks between them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use mutations_core::error::AppError;
use mutations_core::result::AppResult;
use mutations_core::traits::{ParamsValidator, Transport};
use mutations_core::types::{CallOptions, MutationDescriptor, TransportContext};
use mutations_hooks::{CallPayload, ClosureHook, ExecutionPayload, HookRegistry};

use crate::execution::{MutationBody, MutationHandler, body_fn};
use crate::invocation;
use crate::mutation::Mutation;
use crate::validation::ShapeValidator;

/// Entry point of the framework.
#[derive(Debug)]
pub struct MutationRuntime {
    /// Transport used for calls and handler registration.
    transport: Arc<dyn Transport>,
    /// Validator for declared parameter shapes.
    validator: Arc<dyn ParamsValidator>,
    /// Global call hooks, run before every mutation's own call hooks.
    call_hooks: Arc<HookRegistry<CallPayload>>,
    /// Global execution hooks, run before every mutation's own execution hooks.
    execution_hooks: Arc<HookRegistry<ExecutionPayload>>,
    /// Mutation name to id of the descriptor bound to it.
    bindings: RwLock<HashMap<String, Uuid>>,
}

impl MutationRuntime {
    /// Creates a runtime over `transport` with the shape validator.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            validator: Arc::new(ShapeValidator),
            call_hooks: Arc::new(HookRegistry::global()),
            execution_hooks: Arc::new(HookRegistry::global()),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the parameter validator.
    pub fn with_validator(mut self, validator: Arc<dyn ParamsValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// The transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The parameter validator.
    pub fn validator(&self) -> &Arc<dyn ParamsValidator> {
        &self.validator
    }

    /// Global call hook registry.
    pub fn call_hooks(&self) -> &Arc<HookRegistry<CallPayload>> {
        &self.call_hooks
    }

    /// Global execution hook registry.
    pub fn execution_hooks(&self) -> &Arc<HookRegistry<ExecutionPayload>> {
        &self.execution_hooks
    }

    /// Adds a global before-call hook.
    pub async fn add_before_call<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&CallPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.call_hooks
            .add_before(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds a global after-call hook.
    pub async fn add_after_call<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&CallPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.call_hooks
            .add_after(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds a global before-execution hook.
    pub async fn add_before_execution<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&ExecutionPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.execution_hooks
            .add_before(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Adds a global after-execution hook.
    pub async fn add_after_execution<F>(&self, hook_id: &str, hook: F) -> AppResult<()>
    where
        F: Fn(&ExecutionPayload) -> AppResult<()> + Send + Sync + 'static,
    {
        self.execution_hooks
            .add_after(Arc::new(ClosureHook::new(hook_id, hook)))
            .await
    }

    /// Defines a mutation, returning the object callers invoke it through.
    pub fn define(self: &Arc<Self>, descriptor: MutationDescriptor) -> Arc<Mutation> {
        Arc::new(Mutation::new(self.clone(), Arc::new(descriptor)))
    }

    /// Defines a mutation from a config object `{ "name": ..., "params": ... }`.
    pub fn define_config(self: &Arc<Self>, config: &Value) -> AppResult<Arc<Mutation>> {
        Ok(self.define(MutationDescriptor::from_config(config)?))
    }

    /// Calls a mutation by descriptor, running only the global call hooks.
    pub async fn mutate(
        &self,
        descriptor: &Arc<MutationDescriptor>,
        params: Value,
        options: CallOptions,
    ) -> AppResult<Value> {
        invocation::invoke(
            self.transport.as_ref(),
            &[self.call_hooks.as_ref()],
            descriptor,
            params,
            options,
        )
        .await
    }

    /// Binds a body to a descriptor, running only the global execution hooks.
    pub async fn create_mutator<F, Fut>(
        &self,
        descriptor: Arc<MutationDescriptor>,
        body: F,
    ) -> AppResult<()>
    where
        F: Fn(TransportContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<Value>> + Send + 'static,
    {
        let scopes = vec![self.execution_hooks.clone()];
        self.bind(descriptor, scopes, body_fn(body)).await
    }

    /// Registers the execution wrapper for `descriptor` with the transport.
    ///
    /// Rebinding the same descriptor replaces its handler. Binding a
    /// different descriptor under a name that is already bound fails with
    /// `InvalidConfig`.
    pub(crate) async fn bind(
        &self,
        descriptor: Arc<MutationDescriptor>,
        scopes: Vec<Arc<HookRegistry<ExecutionPayload>>>,
        body: MutationBody,
    ) -> AppResult<()> {
        let name = descriptor.name().to_string();

        let mut bindings = self.bindings.write().await;
        let rebinding = match bindings.get(&name) {
            Some(id) if *id != descriptor.id() => {
                return Err(AppError::invalid_config(format!(
                    "Mutation '{name}' is already bound to another descriptor"
                )));
            }
            Some(_) => true,
            None => false,
        };

        let handler = MutationHandler::new(descriptor.clone(), scopes, self.validator.clone(), body);
        self.transport
            .register_handler(&name, Arc::new(handler))
            .await?;
        bindings.insert(name.clone(), descriptor.id());

        info!(mutation = %name, rebinding, "Mutation handler bound");
        Ok(())
    }

    /// Returns whether a handler is bound for `name`.
    pub async fn is_bound(&self, name: &str) -> bool {
        self.bindings.read().await.contains_key(name)
    }
}
