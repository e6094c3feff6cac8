//! # mutations-hooks
//!
//! Hook engine for mutations. Provides:
//!
//! - Call and execution payloads observed by hooks
//! - Ordered before/after hook registries, one per scope
//! - Closure-backed synchronous and fire-and-forget hooks

pub mod definitions;
pub mod handlers;
pub mod registry;

pub use definitions::{CallPayload, ExecutionPayload, HookPayload, HookPhase, HookScope};
pub use handlers::{ClosureHook, SpawnedHook};
pub use registry::{HookHandler, HookPosition, HookRegistry};
