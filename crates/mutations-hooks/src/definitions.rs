//! Hook phases, scopes and the payloads hooks observe.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use mutations_core::error::AppError;
use mutations_core::result::AppResult;
use mutations_core::types::{MutationDescriptor, TransportContext};

/// Points in an invocation where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Caller side, before the transport is invoked.
    BeforeCall,
    /// Caller side, after the transport settled.
    AfterCall,
    /// Callee side, before validation and the body.
    BeforeExecution,
    /// Callee side, after the body (or validation) settled.
    AfterExecution,
}

impl HookPhase {
    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeCall => "before_call",
            Self::AfterCall => "after_call",
            Self::BeforeExecution => "before_execution",
            Self::AfterExecution => "after_execution",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which registry a hook belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookScope {
    /// Shared by every mutation.
    Global,
    /// Attached to a single mutation.
    Instance(String),
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Instance(name) => write!(f, "mutation:{name}"),
        }
    }
}

/// Common view over hook payloads, used for logging.
pub trait HookPayload: Send + Sync + fmt::Debug {
    /// The descriptor of the mutation being called or executed.
    fn descriptor(&self) -> &MutationDescriptor;

    /// The error, if the payload carries a failed outcome.
    fn error(&self) -> Option<&AppError>;
}

/// Payload observed by before-call and after-call hooks.
#[derive(Debug, Clone)]
pub struct CallPayload {
    /// The mutation being called.
    pub descriptor: Arc<MutationDescriptor>,
    /// The parameters sent by the caller.
    pub params: Value,
    /// The call's result. Only set after a successful call.
    pub result: Option<Value>,
    /// The call's error. Only set after a failed call.
    pub error: Option<AppError>,
    /// When the payload was built.
    pub timestamp: DateTime<Utc>,
}

impl CallPayload {
    /// Builds the payload for before-call hooks.
    pub fn before(descriptor: Arc<MutationDescriptor>, params: Value) -> Self {
        Self {
            descriptor,
            params,
            result: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Builds the payload for after-call hooks from the call outcome.
    pub fn after(descriptor: Arc<MutationDescriptor>, params: Value, outcome: &AppResult<Value>) -> Self {
        let (result, error) = split_outcome(outcome);
        Self {
            descriptor,
            params,
            result,
            error,
            timestamp: Utc::now(),
        }
    }
}

impl HookPayload for CallPayload {
    fn descriptor(&self) -> &MutationDescriptor {
        &self.descriptor
    }

    fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }
}

/// Payload observed by before-execution and after-execution hooks.
#[derive(Debug, Clone)]
pub struct ExecutionPayload {
    /// Opaque transport handle for the call being executed.
    pub context: TransportContext,
    /// The mutation being executed.
    pub descriptor: Arc<MutationDescriptor>,
    /// The parameters received from the transport.
    pub params: Value,
    /// The body's result. Only set after a successful execution.
    pub result: Option<Value>,
    /// The validation or body error. Only set after a failed execution.
    pub error: Option<AppError>,
    /// When the payload was built.
    pub timestamp: DateTime<Utc>,
}

impl ExecutionPayload {
    /// Builds the payload for before-execution hooks.
    pub fn before(context: TransportContext, descriptor: Arc<MutationDescriptor>, params: Value) -> Self {
        Self {
            context,
            descriptor,
            params,
            result: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Builds the payload for after-execution hooks from the execution outcome.
    pub fn after(
        context: TransportContext,
        descriptor: Arc<MutationDescriptor>,
        params: Value,
        outcome: &AppResult<Value>,
    ) -> Self {
        let (result, error) = split_outcome(outcome);
        Self {
            context,
            descriptor,
            params,
            result,
            error,
            timestamp: Utc::now(),
        }
    }
}

impl HookPayload for ExecutionPayload {
    fn descriptor(&self) -> &MutationDescriptor {
        &self.descriptor
    }

    fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }
}

fn split_outcome(outcome: &AppResult<Value>) -> (Option<Value>, Option<AppError>) {
    match outcome {
        Ok(result) => (Some(result.clone()), None),
        Err(error) => (None, Some(error.clone())),
    }
}
