//! Unified error types for the mutations framework.
//!
//! Every crate maps its failures into [`AppError`] so that hooks, wrappers
//! and transports can propagate a single error type with the `?` operator.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Something unusable was registered as a hook.
    InvalidHook,
    /// A mutation descriptor is malformed or conflicts with another one.
    InvalidConfig,
    /// Call parameters are not an object.
    InvalidParams,
    /// Parameters failed shape or custom validation at execution time.
    Validation,
    /// The mutation body failed.
    Operation,
    /// A before/after hook failed.
    Hook,
    /// No handler is bound to the requested mutation.
    NotFound,
    /// A call exceeded its `timeout` option.
    Timeout,
    /// The transport failed to deliver the call or its reply.
    Transport,
    /// Loading the application configuration failed.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHook => write!(f, "INVALID_HOOK"),
            Self::InvalidConfig => write!(f, "INVALID_CONFIG"),
            Self::InvalidParams => write!(f, "INVALID_PARAMS"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Operation => write!(f, "OPERATION"),
            Self::Hook => write!(f, "HOOK"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The error type used throughout the framework.
///
/// Hooks observe errors by value inside their payloads, so `AppError` is
/// cloneable. Cloning drops the underlying `source`, keeping kind and message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-hook error.
    pub fn invalid_hook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidHook, message)
    }

    /// Create an invalid-config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig, message)
    }

    /// Create an invalid-params error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an operation error.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Operation, message)
    }

    /// Create a hook error.
    pub fn hook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hook, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
