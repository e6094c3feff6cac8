//! Shared types: descriptors, parameter shapes and transport context.

pub mod context;
pub mod descriptor;
pub mod shape;

pub use context::{CallOptions, TransportContext};
pub use descriptor::{MutationDescriptor, ValidateFn};
pub use shape::ParamsShape;
