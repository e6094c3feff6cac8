//! Parameter validation for the execution side.

use serde_json::Value;
use tracing::debug;

use mutations_core::error::{AppError, ErrorKind};
use mutations_core::result::AppResult;
use mutations_core::traits::ParamsValidator;
use mutations_core::types::{MutationDescriptor, ParamsShape};

/// Default validator: structural match against a [`ParamsShape`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeValidator;

impl ParamsValidator for ShapeValidator {
    fn check(&self, value: &Value, shape: &ParamsShape) -> AppResult<()> {
        shape
            .matches(value)
            .map_err(|reason| AppError::validation(format!("Match error: {reason}")))
    }
}

/// Validates `params` for `descriptor`.
///
/// A custom validator takes precedence over the declared shape. Any failure
/// from the custom validator is reported as a `Validation` error.
pub fn validate_params(
    descriptor: &MutationDescriptor,
    validator: &dyn ParamsValidator,
    params: &Value,
) -> AppResult<()> {
    if let Some(validate) = descriptor.validator() {
        return validate(params).map_err(|err| {
            if err.is(ErrorKind::Validation) {
                err
            } else {
                let message = err.message.clone();
                AppError::with_source(ErrorKind::Validation, message, err)
            }
        });
    }

    if let Some(shape) = descriptor.params_shape() {
        return validator.check(params, shape);
    }

    debug!(mutation = %descriptor.name(), "No params shape declared, skipping validation");
    Ok(())
}
