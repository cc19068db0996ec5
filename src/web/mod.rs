//! HTTP response helpers.
//!
//! Query results go through the content-negotiated writers in [`writer`].
//! Administrative endpoints answer with either a full body or a bare status.

pub mod writer;

use crate::core::RouterError;
use axum::Json;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::header;
use serde::Serialize;

pub use writer::{
    BinaryResponseWriter, JsonResponseWriter, MsgPackResponseWriter, QueryResponseWriter,
    ResponseWriters, XmlResponseWriter, write_response,
};

/// Content type of the ping and schema endpoints.
pub const CONTENT_TYPE_TEXT_XML: &str = "text/xml";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

/// Status plus JSON error body, used for faults on the query path.
pub fn error_response(err: &RouterError) -> Response {
    let body = Json(ErrorResponse {
        error: err.to_string(),
        code: err.code().to_string(),
    });
    (err.status(), body).into_response()
}

/// A status code with no body.
pub fn bare_status(status: StatusCode) -> Response {
    (status, Body::empty()).into_response()
}

/// A `text/xml` success body.
pub fn xml_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_TEXT_XML)],
        body,
    )
        .into_response()
}
