//! Trait seams for the external collaborators of the hook engine.

pub mod transport;
pub mod validator;

pub use transport::{MethodHandler, Transport};
pub use validator::ParamsValidator;
