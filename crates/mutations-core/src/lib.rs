//! # mutations-core
//!
//! Core crate for the mutations framework. Contains the unified error
//! system, configuration schemas, mutation descriptors and parameter
//! shapes, and the transport/validator traits the hook engine is built on.
//!
//! This crate has **no** internal dependencies on other mutations crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
