//! Mutation descriptors: the declarative definition of one remote operation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::shape::ParamsShape;
use crate::error::AppError;
use crate::result::AppResult;

/// Custom parameter validator. Replaces the shape check when present.
pub type ValidateFn = Arc<dyn Fn(&Value) -> AppResult<()> + Send + Sync>;

/// Keys accepted by [`MutationDescriptor::from_config`].
const CONFIG_KEYS: [&str; 2] = ["name", "params"];

/// Declarative definition of a mutation.
///
/// Descriptors are checked when they are built, so a malformed definition
/// fails at setup and never at call time. Fields are private; once built a
/// descriptor is shared behind an `Arc` and never changes.
#[derive(Clone)]
pub struct MutationDescriptor {
    id: Uuid,
    name: String,
    params: Option<ParamsShape>,
    validate: Option<ValidateFn>,
}

impl MutationDescriptor {
    /// Creates a descriptor with no parameter checks.
    ///
    /// Fails with `InvalidConfig` if `name` is empty.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::invalid_config(
                "You must provide a non-empty \"name\" for your mutation",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            params: None,
            validate: None,
        })
    }

    /// Builds a descriptor from a config object `{ "name": ..., "params": ... }`.
    pub fn from_config(config: &Value) -> AppResult<Self> {
        let Some(fields) = config.as_object() else {
            return Err(AppError::invalid_config(
                "Mutation config must be an object",
            ));
        };

        let name = match fields.get("name") {
            Some(Value::String(name)) => name.as_str(),
            _ => {
                return Err(AppError::invalid_config(
                    "You must provide a \"name\" property to your mutation config",
                ));
            }
        };

        if let Some(unknown) = fields.keys().find(|k| !CONFIG_KEYS.contains(&k.as_str())) {
            return Err(AppError::invalid_config(format!(
                "Unknown key '{unknown}' in mutation '{name}'"
            )));
        }

        let descriptor = Self::new(name)?;
        match fields.get("params") {
            None | Some(Value::Null) => Ok(descriptor),
            Some(shape) => descriptor.with_params_json(shape),
        }
    }

    /// Sets the parameter shape.
    ///
    /// Parameters always arrive as an object, so a shape no object can
    /// satisfy fails with `InvalidConfig`.
    pub fn with_params(mut self, shape: ParamsShape) -> AppResult<Self> {
        if !shape.accepts_object() {
            return Err(AppError::invalid_config(format!(
                "Mutation '{}' takes an object of params, but its \"params\" shape is {shape}",
                self.name
            )));
        }
        self.params = Some(shape);
        Ok(self)
    }

    /// Sets the parameter shape from its JSON description.
    ///
    /// Fails with `InvalidConfig` naming this mutation if the description
    /// is not a shape.
    pub fn with_params_json(self, shape: &Value) -> AppResult<Self> {
        let shape = ParamsShape::parse(shape).map_err(|e| {
            AppError::invalid_config(format!(
                "Invalid \"params\" shape in mutation '{}': {e}",
                self.name
            ))
        })?;
        self.with_params(shape)
    }

    /// Sets a custom validator, used instead of the parameter shape.
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> AppResult<()> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Unique identity of this descriptor, distinct even between
    /// descriptors sharing a name.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The mutation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameter shape.
    pub fn params_shape(&self) -> Option<&ParamsShape> {
        self.params.as_ref()
    }

    /// The custom validator.
    pub fn validator(&self) -> Option<&ValidateFn> {
        self.validate.as_ref()
    }
}

impl fmt::Debug for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl fmt::Display for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
