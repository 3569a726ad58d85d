//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Extractor failures (malformed JSON bodies, forms, query strings and
//! path segments) are routed through the same payload so clients only ever
//! see one error shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(
            trace_id = error.trace_id().unwrap_or_default(),
            message = error.message(),
            "internal error redacted from response"
        );
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn rejected(source: &'static str, request: &HttpRequest, detail: String) -> actix_web::Error {
    warn!(source, path = %request.path(), %detail, "request rejected by extractor");
    Error::invalid_request(format!("malformed {source}: {detail}")).into()
}

/// `JsonConfig` error handler rendering body failures as `invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, request: &HttpRequest) -> actix_web::Error {
    rejected("JSON body", request, err.to_string())
}

/// `FormConfig` error handler rendering form failures as `invalid_request`.
pub fn form_error_handler(err: UrlencodedError, request: &HttpRequest) -> actix_web::Error {
    rejected("form body", request, err.to_string())
}

/// `QueryConfig` error handler rendering query failures as `invalid_request`.
pub fn query_error_handler(err: QueryPayloadError, request: &HttpRequest) -> actix_web::Error {
    rejected("query string", request, err.to_string())
}

/// `PathConfig` error handler rendering path failures as `invalid_request`.
pub fn path_error_handler(err: PathError, request: &HttpRequest) -> actix_web::Error {
    rejected("path", request, err.to_string())
}
