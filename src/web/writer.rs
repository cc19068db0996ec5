//! Content-negotiated serialization of query responses.
//!
//! A writer declares its content type and whether it produces bytes or text.
//! [`write_response`] picks the output path from that declaration, never from
//! the response content.

use super::error_response;
use crate::core::{Result, RouterError, escape_xml};
use crate::execution::{CoreRequest, QueryResponse};
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, Method, header};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

pub const CONTENT_TYPE_XML_UTF8: &str = "text/xml; charset=UTF-8";
pub const CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=UTF-8";
pub const CONTENT_TYPE_MSGPACK: &str = "application/x-msgpack";

/// Writer used when `wt` is absent or unknown.
pub const STANDARD_WRITER: &str = "standard";

pub trait QueryResponseWriter: Send + Sync {
    fn content_type(&self, request: &CoreRequest, response: &QueryResponse) -> String;

    fn write_text(&self, request: &CoreRequest, response: &QueryResponse) -> Result<String>;

    /// Writers that emit raw bytes expose themselves here.
    fn as_binary(&self) -> Option<&dyn BinaryResponseWriter> {
        None
    }
}

pub trait BinaryResponseWriter: QueryResponseWriter {
    fn write_binary(&self, request: &CoreRequest, response: &QueryResponse) -> Result<Vec<u8>>;
}

/// Renders values in the classic `<response><lst name=..>` layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlResponseWriter;

impl XmlResponseWriter {
    fn write_value(out: &mut String, name: Option<&str>, value: &JsonValue) {
        let name_attr = name
            .map(|name| format!(" name=\"{}\"", escape_xml(name)))
            .unwrap_or_default();
        match value {
            JsonValue::Null => out.push_str(&format!("<null{name_attr}/>")),
            JsonValue::Bool(flag) => out.push_str(&format!("<bool{name_attr}>{flag}</bool>")),
            JsonValue::Number(number) if number.is_f64() => {
                out.push_str(&format!("<double{name_attr}>{number}</double>"))
            }
            JsonValue::Number(number) => {
                out.push_str(&format!("<long{name_attr}>{number}</long>"))
            }
            JsonValue::String(text) => {
                out.push_str(&format!("<str{name_attr}>{}</str>", escape_xml(text)))
            }
            JsonValue::Array(items) => {
                out.push_str(&format!("<arr{name_attr}>"));
                for item in items {
                    Self::write_value(out, None, item);
                }
                out.push_str("</arr>");
            }
            JsonValue::Object(entries) => {
                out.push_str(&format!("<lst{name_attr}>"));
                for (key, item) in entries {
                    Self::write_value(out, Some(key), item);
                }
                out.push_str("</lst>");
            }
        }
    }
}

impl QueryResponseWriter for XmlResponseWriter {
    fn content_type(&self, _request: &CoreRequest, _response: &QueryResponse) -> String {
        CONTENT_TYPE_XML_UTF8.to_string()
    }

    fn write_text(&self, _request: &CoreRequest, response: &QueryResponse) -> Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<response>");
        for (key, value) in response.values() {
            Self::write_value(&mut out, Some(key), value);
        }
        out.push_str("</response>");
        Ok(out)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResponseWriter;

impl QueryResponseWriter for JsonResponseWriter {
    fn content_type(&self, _request: &CoreRequest, _response: &QueryResponse) -> String {
        CONTENT_TYPE_JSON_UTF8.to_string()
    }

    fn write_text(&self, request: &CoreRequest, response: &QueryResponse) -> Result<String> {
        let text = if request.param("indent").is_some_and(|v| v == "true" || v == "on") {
            serde_json::to_string_pretty(response.values())?
        } else {
            serde_json::to_string(response.values())?
        };
        Ok(text)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackResponseWriter;

impl QueryResponseWriter for MsgPackResponseWriter {
    fn content_type(&self, _request: &CoreRequest, _response: &QueryResponse) -> String {
        CONTENT_TYPE_MSGPACK.to_string()
    }

    fn write_text(&self, _request: &CoreRequest, _response: &QueryResponse) -> Result<String> {
        Err(RouterError::Serialization(
            "msgpack writer only produces binary output".to_string(),
        ))
    }

    fn as_binary(&self) -> Option<&dyn BinaryResponseWriter> {
        Some(self)
    }
}

impl BinaryResponseWriter for MsgPackResponseWriter {
    fn write_binary(&self, _request: &CoreRequest, response: &QueryResponse) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(response.values())
            .map_err(|e| RouterError::Serialization(e.to_string()))
    }
}

/// Writers keyed by the `wt` request parameter.
#[derive(Clone)]
pub struct ResponseWriters {
    writers: HashMap<String, Arc<dyn QueryResponseWriter>>,
}

impl ResponseWriters {
    pub fn empty() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, writer: Arc<dyn QueryResponseWriter>) {
        self.writers.insert(name.into(), writer);
    }

    /// Looks up `wt`, falling back to the standard writer.
    pub fn resolve(&self, wt: Option<&str>) -> Arc<dyn QueryResponseWriter> {
        wt.and_then(|name| self.writers.get(name))
            .or_else(|| self.writers.get(STANDARD_WRITER))
            .cloned()
            .unwrap_or_else(|| Arc::new(XmlResponseWriter))
    }
}

impl Default for ResponseWriters {
    fn default() -> Self {
        let xml: Arc<dyn QueryResponseWriter> = Arc::new(XmlResponseWriter);
        let mut writers = Self::empty();
        writers.register(STANDARD_WRITER, xml.clone());
        writers.register("xml", xml);
        writers.register("json", Arc::new(JsonResponseWriter));
        writers.register("msgpack", Arc::new(MsgPackResponseWriter));
        writers
    }
}

/// Writes a query response, or its exception as an error response.
///
/// HEAD requests get the negotiated headers and an empty body.
pub fn write_response(
    method: &Method,
    request: &CoreRequest,
    response: &QueryResponse,
    writer: &dyn QueryResponseWriter,
) -> Response {
    if let Some(err) = response.exception() {
        return error_response(err);
    }

    let content_type = writer.content_type(request, response);
    let content_type = match HeaderValue::from_str(&content_type) {
        Ok(value) => value,
        Err(e) => {
            return error_response(&RouterError::Serialization(format!(
                "invalid content type '{}': {}",
                content_type, e
            )));
        }
    };

    if *method == Method::HEAD {
        return ([(header::CONTENT_TYPE, content_type)], Body::empty()).into_response();
    }

    let body = match writer.as_binary() {
        Some(binary) => binary.write_binary(request, response).map(Body::from),
        None => writer.write_text(request, response).map(Body::from),
    };

    match body {
        Ok(body) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;

    fn sample_response() -> QueryResponse {
        let mut response = QueryResponse::new()
            .with("numFound", json!(2))
            .with("docs", json!([{"id": "1", "score": 1.5}, {"id": "2", "hit": true}]));
        response.set_response_header(0, 3);
        response
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec()
    }

    #[test]
    fn unknown_writer_falls_back_to_standard() {
        let writers = ResponseWriters::default();
        let request = CoreRequest::new(Method::GET, "/select");
        let response = QueryResponse::new();
        for wt in [None, Some("velocity")] {
            assert_eq!(
                writers.resolve(wt).content_type(&request, &response),
                CONTENT_TYPE_XML_UTF8
            );
        }
        assert_eq!(
            writers.resolve(Some("json")).content_type(&request, &response),
            CONTENT_TYPE_JSON_UTF8
        );
    }

    #[test]
    fn xml_writer_renders_typed_elements() {
        let request = CoreRequest::new(Method::GET, "/select");
        let xml = XmlResponseWriter.write_text(&request, &sample_response()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<response>\
             <lst name=\"responseHeader\"><long name=\"status\">0</long><long name=\"QTime\">3</long></lst>\
             <long name=\"numFound\">2</long>\
             <arr name=\"docs\"><lst><str name=\"id\">1</str><double name=\"score\">1.5</double></lst>\
             <lst><str name=\"id\">2</str><bool name=\"hit\">true</bool></lst></arr>\
             </response>"
        );
    }

    #[tokio::test]
    async fn binary_writer_is_selected_by_capability() {
        let request = CoreRequest::new(Method::GET, "/select");
        let response = sample_response();
        let written = write_response(&Method::GET, &request, &response, &MsgPackResponseWriter);
        assert_eq!(
            written.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_MSGPACK
        );
        let bytes = body_bytes(written).await;
        let decoded: serde_json::Value = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded["numFound"], json!(2));
    }

    #[tokio::test]
    async fn head_writes_headers_only() {
        let request = CoreRequest::new(Method::HEAD, "/select");
        let written = write_response(&Method::HEAD, &request, &sample_response(), &JsonResponseWriter);
        assert_eq!(written.status(), StatusCode::OK);
        assert_eq!(
            written.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_JSON_UTF8
        );
        assert!(body_bytes(written).await.is_empty());
    }

    #[tokio::test]
    async fn exception_replaces_success_body() {
        let request = CoreRequest::new(Method::GET, "/select");
        let response = QueryResponse::from_error(RouterError::NotFound("core 'x'".to_string()));
        let written = write_response(&Method::GET, &request, &response, &XmlResponseWriter);
        assert_eq!(written.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(written).await).unwrap();
        assert_eq!(body["code"], json!("not_found"));
    }
}
