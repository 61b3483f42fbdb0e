//! Uniform result envelope
//!
//! Every asynchronous operation finishes with a [`RestResult`]: either the
//! object it produced or a [`Status`] describing the outcome. Synchronous
//! failures ([`ApiError`]) can be rendered into the same [`Status`] shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ApiError, ErrorKind, RegistryError};

/// Coarse outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOutcome {
    Success,
    Failure,
    /// Accepted but not finished within the caller's wait
    Working,
}

impl StatusOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusOutcome::Success => "Success",
            StatusOutcome::Failure => "Failure",
            StatusOutcome::Working => "Working",
        }
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable failure reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusReason {
    Unknown,
    NotFound,
    AlreadyExists,
    Conflict,
    Invalid,
    BadRequest,
    MethodNotAllowed,
    Timeout,
}

impl StatusReason {
    /// HTTP-style status code for the reason
    pub fn code(&self) -> u16 {
        match self {
            StatusReason::Unknown => 500,
            StatusReason::NotFound => 404,
            StatusReason::AlreadyExists => 409,
            StatusReason::Conflict => 409,
            StatusReason::Invalid => 422,
            StatusReason::BadRequest => 400,
            StatusReason::MethodNotAllowed => 405,
            StatusReason::Timeout => 504,
        }
    }
}

impl From<ErrorKind> for StatusReason {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => StatusReason::NotFound,
            ErrorKind::AlreadyExists => StatusReason::AlreadyExists,
            ErrorKind::Conflict => StatusReason::Conflict,
            ErrorKind::Cancelled => StatusReason::Timeout,
            ErrorKind::InvalidSelector => StatusReason::BadRequest,
            ErrorKind::Internal => StatusReason::Unknown,
        }
    }
}

/// Single field-level cause attached to a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCause {
    pub field: String,
    pub message: String,
}

/// Which object a status refers to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetails {
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<StatusCause>,
}

impl StatusDetails {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            causes: Vec::new(),
        }
    }
}

/// Operation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: StatusOutcome,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StatusDetails>,
}

impl Status {
    pub fn success() -> Self {
        Self {
            status: StatusOutcome::Success,
            message: StatusOutcome::Success.as_str().to_string(),
            reason: None,
            code: 200,
            details: None,
        }
    }

    pub fn failure(reason: StatusReason, message: impl Into<String>) -> Self {
        Self {
            status: StatusOutcome::Failure,
            message: message.into(),
            reason: Some(reason),
            code: reason.code(),
            details: None,
        }
    }

    /// Operation still running when the caller stopped waiting
    pub fn working() -> Self {
        Self {
            status: StatusOutcome::Working,
            message: "the operation is still in progress".to_string(),
            reason: None,
            code: 202,
            details: None,
        }
    }

    /// Terminal status for a registry failure. The message is the registry's
    /// message verbatim.
    pub fn from_registry_error(err: &RegistryError) -> Self {
        Self::failure(StatusReason::from(err.kind), err.message.clone())
    }

    pub fn with_details(mut self, details: StatusDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusOutcome::Success
    }
}

impl From<&ApiError> for Status {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Validation(invalid) => {
                Status::failure(StatusReason::Invalid, invalid.to_string()).with_details(
                    StatusDetails {
                        kind: invalid.kind.to_string(),
                        name: invalid.name.clone(),
                        causes: invalid
                            .causes
                            .iter()
                            .map(|c| StatusCause {
                                field: c.field.to_string(),
                                message: c.kind.as_str().to_string(),
                            })
                            .collect(),
                    },
                )
            }
            ApiError::UnsupportedOperation { resource, .. } => {
                Status::failure(StatusReason::MethodNotAllowed, err.to_string())
                    .with_details(StatusDetails::new(resource.clone(), ""))
            }
            ApiError::Registry(registry) => Status::from_registry_error(registry),
            ApiError::NoRuntime(_) => Status::failure(StatusReason::Unknown, err.to_string()),
        }
    }
}

/// Discriminant of a [`RestResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Object,
    Status,
}

/// Value delivered on a completion handle
#[derive(Debug, Clone, PartialEq)]
pub enum RestResult<T> {
    Object(T),
    Status(Status),
}

impl<T> RestResult<T> {
    pub fn kind(&self) -> ResultKind {
        match self {
            RestResult::Object(_) => ResultKind::Object,
            RestResult::Status(_) => ResultKind::Status,
        }
    }

    /// Object results and success statuses count as success.
    pub fn is_success(&self) -> bool {
        match self {
            RestResult::Object(_) => true,
            RestResult::Status(status) => status.is_success(),
        }
    }

    pub fn object(&self) -> Option<&T> {
        match self {
            RestResult::Object(obj) => Some(obj),
            RestResult::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<&Status> {
        match self {
            RestResult::Object(_) => None,
            RestResult::Status(status) => Some(status),
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self {
            RestResult::Object(obj) => Some(obj),
            RestResult::Status(_) => None,
        }
    }
}
