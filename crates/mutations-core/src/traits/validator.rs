//! Parameter validation abstraction.

use std::fmt;

use serde_json::Value;

use crate::result::AppResult;
use crate::types::shape::ParamsShape;

/// Structural parameter validation.
pub trait ParamsValidator: Send + Sync + fmt::Debug {
    /// Checks `value` against `shape`, failing with a `Validation` error
    /// that describes the mismatch.
    fn check(&self, value: &Value, shape: &ParamsShape) -> AppResult<()>;
}
