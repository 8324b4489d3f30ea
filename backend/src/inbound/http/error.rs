//! Rendering of domain errors as Shelfmates JSON envelopes.
//!
//! Every failure leaves the API as `{ code, message, traceId?, details? }`
//! with a status derived from the error kind. Internal failures are logged in
//! full and replaced by a generic message before they reach the client.
//! Extractor rejections are folded into the same envelope as
//! `invalid_argument` errors tagged with the part of the request that failed.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::AlreadyExists => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The envelope a client is allowed to see.
///
/// Internal errors lose their message and details. Errors raised outside a
/// request scope pick up the active trace identifier at render time.
fn client_envelope(error: &Error) -> Error {
    let mut envelope = match error.code() {
        ErrorCode::InternalError => Error::internal(REDACTED_MESSAGE),
        _ => error.clone(),
    };
    let trace_id = error
        .trace_id()
        .map(str::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()));
    if let Some(id) = trace_id {
        envelope = envelope.with_trace_id(id);
    }
    envelope
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                details = ?self.details(),
                "request failed"
            );
        } else {
            debug!(code = ?self.code(), message = self.message(), "request rejected");
        }

        let envelope = client_envelope(self);
        let mut builder = HttpResponse::build(status);
        if let Some(id) = envelope.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(envelope)
    }
}

fn rejected(source: &str, message: String) -> actix_web::Error {
    Error::invalid_argument(message)
        .with_details(json!({ "source": source }))
        .into()
}

/// `JsonConfig` error handler for malformed request bodies.
pub(crate) fn reject_body(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("body", format!("Invalid request body: {err}"))
}

/// `QueryConfig` error handler for malformed query strings.
pub(crate) fn reject_query(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("query", format!("Invalid query string: {err}"))
}

/// `PathConfig` error handler for path segments that fail to deserialise.
pub(crate) fn reject_path(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected("path", format!("Invalid path: {err}"))
}

#[cfg(test)]
mod tests;
