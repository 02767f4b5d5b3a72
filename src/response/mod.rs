//! Uniform JSON response envelopes
//!
//! Every response, success or failure, single record, collection, page or
//! domain error, is rendered into the same top-level shape:
//!
//! ```json
//! {
//!   "status": 200,
//!   "success": true,
//!   "data": {...},
//!   "message": "User successfully listed",
//!   "meta": { "pagination": {...}, "errors": {...} }
//! }
//! ```
//!
//! Exactly one of `data`/`meta.errors` is populated per variant.

pub mod messages;

pub use messages::{ApiMessage, Locale};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::RepositoryError;
use crate::core::pagination::{Page, PageMeta};

/// Reserved key merged into the errors payload for dismissible errors
pub const DISMISSIBLE: &str = "dismissible";

/// CRUD action a response reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Index,
    Store,
    Show,
    Update,
    Destroy,
}

impl Action {
    /// Default success status for the action
    pub fn status(self) -> StatusCode {
        match self {
            Action::Store => StatusCode::CREATED,
            Action::Index | Action::Show | Action::Update | Action::Destroy => StatusCode::OK,
        }
    }
}

/// Successful result of a repository operation
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A single record
    Record(Value),
    /// A homogeneous collection
    Collection(Vec<Value>),
    /// One page of a paginated listing
    Page(Page<Value>),
}

/// Envelope metadata: pagination for pages, errors for failures
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// The uniform wire envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub status: u16,
    pub success: bool,
    pub data: Option<Value>,
    pub message: Option<String>,
    #[serde(default)]
    pub meta: Meta,
}

impl Envelope {
    /// Success envelope with a payload and an optional message
    pub fn success(status: StatusCode, data: Option<Value>, message: Option<String>) -> Self {
        Self {
            status: status.as_u16(),
            success: true,
            data,
            message: message.filter(|m| !m.is_empty()),
            meta: Meta::default(),
        }
    }

    /// Success envelope for one page of records
    pub fn paginated(status: StatusCode, page: Page<Value>, message: Option<String>) -> Self {
        let mut envelope = Self::success(status, Some(Value::Array(page.items)), message);
        envelope.meta.pagination = Some(page.meta);
        envelope
    }

    /// Error envelope with an optional structured errors payload
    pub fn error(
        status: StatusCode,
        message: impl Into<String>,
        errors: Option<Value>,
        dismissible: bool,
    ) -> Self {
        Self {
            status: status.as_u16(),
            success: false,
            data: None,
            message: Some(message.into()),
            meta: Meta {
                pagination: None,
                errors: merge_dismissible(errors, dismissible),
            },
        }
    }

    /// Render a domain error into its envelope
    pub fn from_error(err: &RepositoryError) -> Self {
        Self::error(
            err.status(),
            err.message(),
            err.errors_payload(),
            err.is_dismissible(),
        )
    }
}

/// Merge the dismissible flag into the errors payload under its reserved key
fn merge_dismissible(errors: Option<Value>, dismissible: bool) -> Option<Value> {
    if !dismissible {
        return errors;
    }

    match errors {
        None => Some(serde_json::json!({ DISMISSIBLE: true })),
        Some(Value::Object(mut map)) => {
            map.insert(DISMISSIBLE.to_string(), Value::Bool(true));
            Some(Value::Object(map))
        }
        Some(other) => Some(serde_json::json!({ DISMISSIBLE: true, "data": other })),
    }
}

/// Builds envelopes for one locale
///
/// Stateless per invocation; construct one wherever a locale is at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Responder {
    locale: Locale,
}

impl Responder {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Render a repository result for a CRUD action
    ///
    /// Success envelopes take the action's default status and templated
    /// message; pages additionally attach pagination metadata. Errors are
    /// rendered from the taxonomy: validation → 422 with the field map,
    /// not-found → 404, operation failures → 500.
    pub fn respond(
        &self,
        result: Result<Outcome, RepositoryError>,
        action: Action,
        entity: &str,
    ) -> Envelope {
        match result {
            Ok(outcome) => {
                let status = action.status();
                let message = Some(messages::success(self.locale, action, entity));

                match outcome {
                    Outcome::Record(record) => Envelope::success(status, Some(record), message),
                    Outcome::Collection(records) => {
                        Envelope::success(status, Some(Value::Array(records)), message)
                    }
                    Outcome::Page(page) => Envelope::paginated(status, page, message),
                }
            }
            Err(err) => Envelope::from_error(&err),
        }
    }

    /// Render a response from bare parts
    ///
    /// A missing status defaults to 200. Statuses below 400 produce a success
    /// envelope with the given payload; everything else an error envelope
    /// with just the message.
    pub fn simply_respond(
        &self,
        status: Option<StatusCode>,
        message: &str,
        data: Option<Value>,
    ) -> Envelope {
        let status = status.unwrap_or(StatusCode::OK);

        if status.as_u16() < 400 {
            Envelope::success(status, data, Some(message.to_string()))
        } else {
            Envelope::error(status, message, None, false)
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FieldErrors;
    use crate::core::pagination::PageMeta;
    use serde_json::json;

    #[test]
    fn test_action_status_table() {
        assert_eq!(Action::Index.status(), StatusCode::OK);
        assert_eq!(Action::Store.status(), StatusCode::CREATED);
        assert_eq!(Action::Show.status(), StatusCode::OK);
        assert_eq!(Action::Update.status(), StatusCode::OK);
        assert_eq!(Action::Destroy.status(), StatusCode::OK);
    }

    #[test]
    fn test_store_success_envelope() {
        let responder = Responder::default();
        let record = json!({"id": "1", "name": "Ada"});

        let envelope = responder.respond(
            Ok(Outcome::Record(record.clone())),
            Action::Store,
            "User",
        );

        assert_eq!(envelope.status, 201);
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(record));
        assert_eq!(envelope.message.as_deref(), Some("User successfully created"));
        assert_eq!(envelope.meta, Meta::default());
    }

    #[test]
    fn test_paginated_envelope_attaches_meta() {
        let responder = Responder::default();
        let page = Page {
            items: vec![json!({"id": "1"})],
            meta: PageMeta::new(3, 10, 25),
        };

        let envelope = responder.respond(Ok(Outcome::Page(page)), Action::Index, "User");

        assert_eq!(envelope.status, 200);
        let pagination = envelope.meta.pagination.unwrap();
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.page_size, 10);
        assert!(pagination.last_page);
        assert_eq!(pagination.total, 25);
    }

    #[test]
    fn test_validation_error_envelope() {
        let responder = Responder::default();
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), vec!["required".to_string()]);
        let err = RepositoryError::validation("Validation failed", errors);

        let envelope = responder.respond(Err(err), Action::Store, "User");

        assert_eq!(envelope.status, 422);
        assert!(!envelope.success);
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("Validation failed"));
        assert_eq!(envelope.meta.errors, Some(json!({"email": ["required"]})));
    }

    #[test]
    fn test_dismissible_merges_into_errors() {
        let err = RepositoryError::delete("Error deleting User", Some(json!({"source": "boom"})))
            .dismissible();

        let envelope = Envelope::from_error(&err);

        assert_eq!(
            envelope.meta.errors,
            Some(json!({"source": "boom", "dismissible": true}))
        );
    }

    #[test]
    fn test_dismissible_without_errors_payload() {
        let err = RepositoryError::update("Error updating User", None).dismissible();

        let envelope = Envelope::from_error(&err);

        assert_eq!(envelope.meta.errors, Some(json!({"dismissible": true})));
    }

    #[test]
    fn test_simply_respond_defaults_to_ok() {
        let responder = Responder::default();
        let envelope = responder.simply_respond(None, "done", Some(json!({"ok": true})));

        assert_eq!(envelope.status, 200);
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!({"ok": true})));
    }

    #[test]
    fn test_simply_respond_error_branch() {
        let responder = Responder::default();
        let envelope =
            responder.simply_respond(Some(StatusCode::UNPROCESSABLE_ENTITY), "bad input", None);

        assert_eq!(envelope.status, 422);
        assert!(!envelope.success);
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("bad input"));
    }

    #[test]
    fn test_empty_message_is_omitted() {
        let envelope = Envelope::success(StatusCode::OK, None, Some(String::new()));
        assert_eq!(envelope.message, None);
    }
}
