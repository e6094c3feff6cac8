//! Callee side: the transport handler that runs a mutation body between
//! before-execution and after-execution hooks.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use mutations_core::error::{AppError, ErrorKind};
use mutations_core::result::AppResult;
use mutations_core::traits::{MethodHandler, ParamsValidator};
use mutations_core::types::{MutationDescriptor, TransportContext};
use mutations_hooks::{ExecutionPayload, HookPhase, HookRegistry};

use crate::validation::validate_params;

/// A mutation body: receives the transport context and the parameters.
pub type MutationBody =
    Arc<dyn Fn(TransportContext, Value) -> BoxFuture<'static, AppResult<Value>> + Send + Sync>;

/// Boxes an async closure into a [`MutationBody`].
pub fn body_fn<F, Fut>(body: F) -> MutationBody
where
    F: Fn(TransportContext, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<Value>> + Send + 'static,
{
    Arc::new(
        move |context: TransportContext, params: Value| -> BoxFuture<'static, AppResult<Value>> {
            Box::pin(body(context, params))
        },
    )
}

/// Stages of a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStage {
    Received,
    BeforeHooksRunning,
    Validating,
    BodyRunning,
    AfterHooksRunning,
    Returned,
    Raised,
}

impl ExecutionStage {
    /// Returns the string name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::BeforeHooksRunning => "before_hooks_running",
            Self::Validating => "validating",
            Self::BodyRunning => "body_running",
            Self::AfterHooksRunning => "after_hooks_running",
            Self::Returned => "returned",
            Self::Raised => "raised",
        }
    }
}

impl fmt::Display for ExecutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport handler for one mutation.
pub struct MutationHandler {
    /// The mutation this handler executes.
    descriptor: Arc<MutationDescriptor>,
    /// Execution hook registries, dispatched in order (global first).
    scopes: Vec<Arc<HookRegistry<ExecutionPayload>>>,
    /// Shape validator.
    validator: Arc<dyn ParamsValidator>,
    /// The mutation body.
    body: MutationBody,
}

impl MutationHandler {
    /// Creates a handler.
    pub fn new(
        descriptor: Arc<MutationDescriptor>,
        scopes: Vec<Arc<HookRegistry<ExecutionPayload>>>,
        validator: Arc<dyn ParamsValidator>,
        body: MutationBody,
    ) -> Self {
        Self {
            descriptor,
            scopes,
            validator,
            body,
        }
    }

    /// The mutation this handler executes.
    pub fn descriptor(&self) -> &Arc<MutationDescriptor> {
        &self.descriptor
    }

    fn advance(&self, stage: &mut ExecutionStage, next: ExecutionStage) {
        trace!(
            mutation = %self.descriptor.name(),
            from = %stage,
            to = %next,
            "Execution stage"
        );
        *stage = next;
    }

    /// Validation then body. Both failures are captured as the outcome.
    async fn run_body(
        &self,
        stage: &mut ExecutionStage,
        context: &TransportContext,
        params: &Value,
    ) -> AppResult<Value> {
        self.advance(stage, ExecutionStage::Validating);
        validate_params(&self.descriptor, self.validator.as_ref(), params)?;

        self.advance(stage, ExecutionStage::BodyRunning);
        let body = self.body.clone();
        let (context, params) = (context.clone(), params.clone());
        // Covers a panic while the body builds its future as well.
        let guarded = AssertUnwindSafe(async move { body(context, params).await });
        match guarded.catch_unwind().await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) if err.is(ErrorKind::Operation) => Err(err),
            Ok(Err(err)) => {
                let message = err.message.clone();
                Err(AppError::with_source(ErrorKind::Operation, message, err))
            }
            Err(_) => Err(AppError::operation(format!(
                "Mutation '{}' panicked",
                self.descriptor.name()
            ))),
        }
    }
}

impl fmt::Debug for MutationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationHandler")
            .field("descriptor", &self.descriptor)
            .field("scopes", &self.scopes)
            .field("validator", &self.validator)
            .field("body", &"<fn>")
            .finish()
    }
}

#[async_trait]
impl MethodHandler for MutationHandler {
    async fn call(&self, context: TransportContext, params: Value) -> AppResult<Value> {
        let mut stage = ExecutionStage::Received;
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        self.advance(&mut stage, ExecutionStage::BeforeHooksRunning);
        let payload = ExecutionPayload::before(context.clone(), self.descriptor.clone(), params.clone());
        for registry in &self.scopes {
            registry
                .execute_befores(HookPhase::BeforeExecution, &payload)
                .await?;
        }

        let outcome = self.run_body(&mut stage, &context, &params).await;

        self.advance(&mut stage, ExecutionStage::AfterHooksRunning);
        let payload = ExecutionPayload::after(context, self.descriptor.clone(), params, &outcome);
        for registry in &self.scopes {
            registry
                .execute_afters(HookPhase::AfterExecution, &payload)
                .await?;
        }

        match &outcome {
            Ok(_) => self.advance(&mut stage, ExecutionStage::Returned),
            Err(err) => {
                debug!(mutation = %self.descriptor.name(), error = %err, "Mutation raised");
                self.advance(&mut stage, ExecutionStage::Raised);
            }
        }
        outcome
    }
}
