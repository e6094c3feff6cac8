//! Debug hooks that log calls and executions.
//!
//! Installed as global hooks. They log through `tracing` while the switch
//! is on and do nothing otherwise, so turning debugging off at runtime
//! needs no unregistration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};

use mutations_core::config::debug::DebugConfig;
use mutations_core::result::AppResult;
use mutations_hooks::{CallPayload, ExecutionPayload};

use crate::runtime::MutationRuntime;

/// Hook id prefix of the debug hooks.
pub const DEBUG_HOOK_PREFIX: &str = "debug";

/// Shared on/off switch for the debug hooks.
#[derive(Debug, Clone)]
pub struct DebugSwitch {
    enabled: Arc<AtomicBool>,
}

impl DebugSwitch {
    /// Creates a switch in the given state.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Turns debug logging off.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Returns whether debug logging is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Registers the debug hooks on `runtime` and returns their switch.
pub async fn install(runtime: &MutationRuntime, config: &DebugConfig) -> AppResult<DebugSwitch> {
    let switch = DebugSwitch::new(config.enabled);

    let on = switch.clone();
    runtime
        .add_before_call(&format!("{DEBUG_HOOK_PREFIX}.before_call"), move |p: &CallPayload| {
            if on.is_enabled() {
                info!(mutation = %p.descriptor.name(), params = %p.params, "Calling with params");
            }
            Ok(())
        })
        .await?;

    let on = switch.clone();
    runtime
        .add_after_call(&format!("{DEBUG_HOOK_PREFIX}.after_call"), move |p: &CallPayload| {
            if on.is_enabled() {
                match (&p.result, &p.error) {
                    (_, Some(err)) => {
                        error!(mutation = %p.descriptor.name(), error = %err, "Received error")
                    }
                    (result, None) => info!(
                        mutation = %p.descriptor.name(),
                        result = %result.clone().unwrap_or_default(),
                        "Received result"
                    ),
                }
            }
            Ok(())
        })
        .await?;

    let on = switch.clone();
    runtime
        .add_before_execution(
            &format!("{DEBUG_HOOK_PREFIX}.before_execution"),
            move |p: &ExecutionPayload| {
                if on.is_enabled() {
                    info!(
                        mutation = %p.descriptor.name(),
                        connection_id = %p.context.connection_id,
                        params = %p.params,
                        "Received call with params"
                    );
                }
                Ok(())
            },
        )
        .await?;

    info!(enabled = switch.is_enabled(), "Debug hooks installed");
    Ok(switch)
}
