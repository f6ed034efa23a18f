//! JSON envelope shared by every endpoint: `{error, message, data}`.

use std::fmt::{Debug, Display};

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::services::{InternalError, ServiceError};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid input data";
pub const EXCEPTION_MESSAGE: &str = "Something went wrong";
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found";

#[derive(Debug, Serialize)]
pub struct Envelope<'a, T> {
    pub error: bool,
    pub message: &'a str,
    pub data: T,
}

/// Diagnostics attached to a 500 response when error details are exposed.
#[derive(Debug, Serialize)]
pub struct ExceptionDetails<'a> {
    pub exception_message: &'a str,
    pub exception_code: &'a str,
    pub exception_line: u32,
    pub exception_file: &'a str,
}

pub fn success<T: Serialize>(message: &str, data: T, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        error: false,
        message,
        data,
    })
}

pub fn failure<T: Serialize>(message: &str, data: T, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        error: true,
        message,
        data,
    })
}

/// Log an unexpected failure and answer with a generic 500.
///
/// The diagnostics are only echoed back to the client when `expose_details`
/// is set; otherwise `data` is `null`.
pub fn handle_exception(err: &InternalError, expose_details: bool) -> HttpResponse {
    log::error!(
        "{} [code={}, line={}, file={}]",
        err.message,
        err.code,
        err.line,
        err.file
    );

    let details = expose_details.then(|| ExceptionDetails {
        exception_message: &err.message,
        exception_code: err.code,
        exception_line: err.line,
        exception_file: err.file,
    });

    failure(EXCEPTION_MESSAGE, details, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Map a service error onto the envelope.
///
/// Products are the only resource looked up by id, so `NotFound` always
/// answers "Product not found".
pub fn error_response(err: ServiceError, expose_details: bool) -> HttpResponse {
    match err {
        ServiceError::NotFound => failure(
            PRODUCT_NOT_FOUND_MESSAGE,
            json!({ "errors": { "general": PRODUCT_NOT_FOUND_MESSAGE } }),
            StatusCode::NOT_FOUND,
        ),
        ServiceError::Validation(errors) => {
            failure(INVALID_INPUT_MESSAGE, errors, StatusCode::BAD_REQUEST)
        }
        ServiceError::Internal(err) => handle_exception(&err, expose_details),
    }
}

/// 400 envelope for a request body or query string that could not be read.
pub fn invalid_body(err: &dyn Display) -> HttpResponse {
    log::warn!("Rejected request payload: {err}");
    failure(
        INVALID_INPUT_MESSAGE,
        json!({ "errors": { "general": err.to_string() } }),
        StatusCode::BAD_REQUEST,
    )
}

/// Extractor error handler wrapping rejected query strings in the envelope.
pub fn invalid_request<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: Debug + Display + 'static,
{
    let response = invalid_body(&err);
    actix_web::error::InternalError::from_response(err, response).into()
}
