//! Transport implementations.

pub mod local;

pub use local::LocalTransport;
