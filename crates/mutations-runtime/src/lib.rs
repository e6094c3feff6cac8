//! # mutations-runtime
//!
//! Runs mutations through a transport with hooks around both sides:
//!
//! - Caller side: global then per-mutation before-call hooks, transport
//!   call, global then per-mutation after-call hooks
//! - Callee side: before-execution hooks, parameter validation, body,
//!   after-execution hooks
//! - An in-process [`LocalTransport`] and built-in debug hooks

pub mod debug;
pub mod execution;
mod invocation;
pub mod mutation;
pub mod runtime;
pub mod transport;
pub mod validation;

pub use debug::DebugSwitch;
pub use execution::{ExecutionStage, MutationBody, MutationHandler, body_fn};
pub use mutation::Mutation;
pub use runtime::MutationRuntime;
pub use transport::LocalTransport;
pub use validation::ShapeValidator;
