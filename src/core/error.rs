//! Domain error taxonomy for repository operations
//!
//! Every failure a repository can produce is one of these variants. Storage
//! errors are converted at the repository boundary and never leak raw;
//! validation failures short-circuit before any store call; the HTTP layer
//! folds its fixed status responses (401/403/404) into the same type so that
//! every error reaches the client as a well-formed envelope.
//!
//! Each error is logged exactly once, at construction.

use axum::http::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation messages keyed by field name
///
/// A BTreeMap keeps the serialized field order deterministic.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// A typed failure from one CRUD stage
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Listing records failed
    #[error("{message}")]
    Index {
        message: String,
        detail: Option<Value>,
        dismissible: bool,
    },

    /// Creating a record failed
    #[error("{message}")]
    Create {
        message: String,
        detail: Option<Value>,
        dismissible: bool,
    },

    /// The requested record does not exist
    #[error("{message}")]
    Read {
        message: String,
        detail: Option<Value>,
        dismissible: bool,
    },

    /// Updating a record failed
    #[error("{message}")]
    Update {
        message: String,
        detail: Option<Value>,
        dismissible: bool,
    },

    /// Deleting a record failed
    #[error("{message}")]
    Delete {
        message: String,
        detail: Option<Value>,
        dismissible: bool,
    },

    /// Client input failed validation
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
        dismissible: bool,
    },

    /// Fixed HTTP-layer response (401 unauthenticated, 403 forbidden,
    /// 404 routing) carried in the same envelope shape
    #[error("{message}")]
    Http { status: u16, message: String },
}

impl RepositoryError {
    pub fn index(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Index {
            message: message.into(),
            detail,
            dismissible: false,
        }
        .reported()
    }

    pub fn create(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Create {
            message: message.into(),
            detail,
            dismissible: false,
        }
        .reported()
    }

    pub fn read(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Read {
            message: message.into(),
            detail,
            dismissible: false,
        }
        .reported()
    }

    pub fn update(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Update {
            message: message.into(),
            detail,
            dismissible: false,
        }
        .reported()
    }

    pub fn delete(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Delete {
            message: message.into(),
            detail,
            dismissible: false,
        }
        .reported()
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
            dismissible: false,
        }
        .reported()
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status: status.as_u16(),
            message: message.into(),
        }
        .reported()
    }

    /// Mark the error as dismissible by the client UI
    pub fn dismissible(mut self) -> Self {
        match &mut self {
            Self::Index { dismissible, .. }
            | Self::Create { dismissible, .. }
            | Self::Read { dismissible, .. }
            | Self::Update { dismissible, .. }
            | Self::Delete { dismissible, .. }
            | Self::Validation { dismissible, .. } => *dismissible = true,
            Self::Http { .. } => {}
        }
        self
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Read { .. } => StatusCode::NOT_FOUND,
            Self::Index { .. } | Self::Create { .. } | Self::Update { .. } | Self::Delete { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Index { message, .. }
            | Self::Create { message, .. }
            | Self::Read { message, .. }
            | Self::Update { message, .. }
            | Self::Delete { message, .. }
            | Self::Validation { message, .. }
            | Self::Http { message, .. } => message,
        }
    }

    pub fn is_dismissible(&self) -> bool {
        match self {
            Self::Index { dismissible, .. }
            | Self::Create { dismissible, .. }
            | Self::Read { dismissible, .. }
            | Self::Update { dismissible, .. }
            | Self::Delete { dismissible, .. }
            | Self::Validation { dismissible, .. } => *dismissible,
            Self::Http { .. } => false,
        }
    }

    /// Structured payload for the envelope's `meta.errors` slot
    ///
    /// Validation errors expose the field map; operation errors expose their
    /// debug detail when one was attached.
    pub fn errors_payload(&self) -> Option<Value> {
        match self {
            Self::Validation { errors, .. } => serde_json::to_value(errors).ok(),
            Self::Index { detail, .. }
            | Self::Create { detail, .. }
            | Self::Read { detail, .. }
            | Self::Update { detail, .. }
            | Self::Delete { detail, .. } => detail.clone(),
            Self::Http { .. } => None,
        }
    }

    /// Log the error once at construction time
    fn reported(self) -> Self {
        match &self {
            Self::Index { message, detail, .. }
            | Self::Create { message, detail, .. }
            | Self::Read { message, detail, .. }
            | Self::Update { message, detail, .. }
            | Self::Delete { message, detail, .. } => {
                tracing::error!(detail = ?detail, "{message}");
            }
            Self::Validation { message, .. } | Self::Http { message, .. } => {
                tracing::error!("{message}");
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        let errors = FieldErrors::new();
        assert_eq!(
            RepositoryError::validation("Validation failed", errors).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RepositoryError::read("not found", None).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RepositoryError::index("failed", None).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RepositoryError::http(StatusCode::UNAUTHORIZED, "nope").status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_validation_errors_payload() {
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), vec!["required".to_string()]);

        let err = RepositoryError::validation("Validation failed", errors);

        assert_eq!(err.message(), "Validation failed");
        assert_eq!(
            err.errors_payload(),
            Some(json!({ "email": ["required"] }))
        );
    }

    #[test]
    fn test_operation_error_carries_detail() {
        let err = RepositoryError::create("Error creating User", Some(json!({"source": "boom"})));
        assert_eq!(err.errors_payload(), Some(json!({"source": "boom"})));
    }

    #[test]
    fn test_dismissible_flag() {
        let err = RepositoryError::delete("Error deleting User", None).dismissible();
        assert!(err.is_dismissible());

        let err = RepositoryError::http(StatusCode::FORBIDDEN, "Forbidden");
        assert!(!err.is_dismissible());
    }
}
