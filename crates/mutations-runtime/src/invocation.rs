//! Caller side: wraps a transport call in before-call and after-call hooks.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use mutations_core::error::AppError;
use mutations_core::result::AppResult;
use mutations_core::traits::Transport;
use mutations_core::types::{CallOptions, MutationDescriptor};
use mutations_hooks::{CallPayload, HookPhase, HookRegistry};

/// Accepts object params, and null as an empty object.
pub(crate) fn normalize_params(name: &str, params: Value) -> AppResult<Value> {
    match params {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(params),
        other => Err(AppError::invalid_params(format!(
            "Params for mutation '{name}' must be an object, got {other}"
        ))),
    }
}

/// Performs one invocation.
///
/// `scopes` are dispatched in order for each phase, so callers pass the
/// global registry first. A before-call hook failure aborts the invocation
/// before the transport is called and no after-call hook runs. After-call
/// hooks run for both outcomes; if one of them fails, its error replaces
/// the outcome.
pub(crate) async fn invoke(
    transport: &dyn Transport,
    scopes: &[&HookRegistry<CallPayload>],
    descriptor: &Arc<MutationDescriptor>,
    params: Value,
    options: CallOptions,
) -> AppResult<Value> {
    let name = descriptor.name();
    let params = normalize_params(name, params)?;

    let payload = CallPayload::before(descriptor.clone(), params.clone());
    for registry in scopes {
        registry.execute_befores(HookPhase::BeforeCall, &payload).await?;
    }

    debug!(mutation = %name, "Calling mutation");
    let outcome = transport.invoke(name, params.clone(), options).await;

    let payload = CallPayload::after(descriptor.clone(), params, &outcome);
    for registry in scopes {
        registry.execute_afters(HookPhase::AfterCall, &payload).await?;
    }

    if let Err(err) = &outcome {
        debug!(mutation = %name, error = %err, "Mutation call failed");
    }
    outcome
}
