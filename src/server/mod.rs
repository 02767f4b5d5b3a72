//! HTTP adapter for axum
//!
//! Envelopes and domain errors render directly as axum responses, so handlers
//! can return either. The three fixed HTTP-layer failures (401, 403, routing
//! 404) get envelope constructors here; wire them to the framework's
//! middleware and fallback hooks:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/users", get(list_users))
//!     .fallback(|| async { server::route_not_found(Locale::En) });
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::error::RepositoryError;
use crate::response::{ApiMessage, Envelope, Locale, messages};

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        Envelope::from_error(&self).into_response()
    }
}

/// 401 envelope for unauthenticated requests
pub fn unauthorized(locale: Locale) -> Envelope {
    http_envelope(StatusCode::UNAUTHORIZED, ApiMessage::Unauthorized, locale)
}

/// 403 envelope for forbidden requests
pub fn forbidden(locale: Locale) -> Envelope {
    http_envelope(StatusCode::FORBIDDEN, ApiMessage::Forbidden, locale)
}

/// 404 envelope for unmatched routes
pub fn route_not_found(locale: Locale) -> Envelope {
    http_envelope(StatusCode::NOT_FOUND, ApiMessage::NotFound, locale)
}

fn http_envelope(status: StatusCode, message: ApiMessage, locale: Locale) -> Envelope {
    Envelope::from_error(&RepositoryError::http(status, messages::api(locale, message)))
}
