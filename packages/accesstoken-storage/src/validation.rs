//! AccessToken validation
//!
//! A token is valid when `clientName`, `userName` and `userUID` are all
//! non-empty. Every failing field is reported, in declaration order.

use std::fmt;
use thiserror::Error;

use crate::domain::AccessToken;

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required value",
        }
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind.as_str())
    }
}

/// Rejected token with every failing field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} \"{name}\" is invalid: {}", .causes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub kind: &'static str,
    pub name: String,
    pub causes: Vec<FieldError>,
}

impl ValidationError {
    /// Field names that failed, in order
    pub fn fields(&self) -> Vec<&'static str> {
        self.causes.iter().map(|c| c.field).collect()
    }
}

/// Check the required fields of an access token
pub fn validate_access_token(token: &AccessToken) -> Result<(), ValidationError> {
    let required = [
        ("clientName", &token.client_name),
        ("userName", &token.user_name),
        ("userUID", &token.user_uid),
    ];

    let causes: Vec<FieldError> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| FieldError::required(*field))
        .collect();

    if causes.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            kind: "AccessToken",
            name: token.name().to_string(),
            causes,
        })
    }
}
