//! Error types for accesstoken-storage

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::validation::ValidationError;

/// Registry error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Token does not exist
    NotFound,
    /// Token with the same name already exists
    AlreadyExists,
    /// Concurrent modification detected by the backend
    Conflict,
    /// The execution context was cancelled before the backend finished
    Cancelled,
    /// Selector the backend cannot evaluate
    InvalidSelector,
    /// Anything else the backend reports
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InvalidSelector => "invalid_selector",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error reported by an [`AccessTokenRegistry`](crate::domain::AccessTokenRegistry)
///
/// The source is reference counted so a registry can hand out the same
/// failure more than once. Two registry errors compare equal when their
/// kind and message match and they share the same source allocation.
#[derive(Debug, Clone, Error)]
#[error("[{kind}] {message}")]
pub struct RegistryError {
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl RegistryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    // Convenience constructors
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("accessToken \"{}\" not found", name.into()),
        )
    }

    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!("accessToken \"{}\" already exists", name.into()),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidSelector,
            format!("unsupported selector: {}", selector.into()),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl PartialEq for RegistryError {
    fn eq(&self, other: &Self) -> bool {
        let same_source = match (&self.source, &other.source) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        };
        self.kind == other.kind && self.message == other.message && same_source
    }
}

/// Error returned synchronously by the REST storage operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// The submitted token is missing required fields. Never reaches the registry.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The verb is not available for this resource. Never reaches the registry.
    #[error("{verb} is not supported on resource \"{resource}\"")]
    UnsupportedOperation { verb: &'static str, resource: String },

    /// Registry failure from Get/List, passed through as returned
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Create/Delete called from a thread without a tokio runtime
    #[error("no async runtime to run the operation on: {0}")]
    NoRuntime(String),
}

impl ApiError {
    pub fn unsupported(verb: &'static str, resource: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            verb,
            resource: resource.into(),
        }
    }

    /// The registry error carried by this error, if any.
    pub fn registry_error(&self) -> Option<&RegistryError> {
        match self {
            ApiError::Registry(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for the REST storage operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Result type alias for registry calls
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
