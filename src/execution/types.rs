use crate::core::{RouterError, TenantId};
use axum::body::Bytes;
use http::Method;
use serde_json::{Map as JsonMap, Value as JsonValue, json};

/// Key of the header section every query response starts with.
pub const RESPONSE_HEADER_KEY: &str = "responseHeader";

/// A request as handed to a core after routing.
#[derive(Debug, Clone)]
pub struct CoreRequest {
    /// Tenant taken from the path, if the path carried one.
    pub tenant: Option<TenantId>,
    /// Path below the tenant segment, e.g. `/select`.
    pub handler_path: String,
    pub method: Method,
    /// Query parameters in request order.
    pub params: Vec<(String, String)>,
    pub body: Bytes,
}

impl CoreRequest {
    pub fn new(method: Method, handler_path: impl Into<String>) -> Self {
        Self {
            tenant: None,
            handler_path: handler_path.into(),
            method,
            params: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_tenant(mut self, tenant: TenantId) -> Self {
        self.tenant = Some(tenant);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parameters rendered as `a=1&b=2`, for request logging.
    pub fn param_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Named values produced by a core, plus an optional failure marker.
///
/// A response carrying an exception is rendered as an error instead of a
/// success body.
#[derive(Debug, Default)]
pub struct QueryResponse {
    values: JsonMap<String, JsonValue>,
    exception: Option<RouterError>,
}

impl QueryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(err: RouterError) -> Self {
        Self {
            values: JsonMap::new(),
            exception: Some(err),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, value: JsonValue) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.add(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &JsonMap<String, JsonValue> {
        &self.values
    }

    pub fn exception(&self) -> Option<&RouterError> {
        self.exception.as_ref()
    }

    /// Places `responseHeader` first, replacing any header the core wrote.
    pub fn set_response_header(&mut self, status: u16, qtime_ms: u64) {
        let mut values = JsonMap::with_capacity(self.values.len() + 1);
        values.insert(
            RESPONSE_HEADER_KEY.to_string(),
            json!({ "status": status, "QTime": qtime_ms }),
        );
        for (key, value) in std::mem::take(&mut self.values) {
            if key != RESPONSE_HEADER_KEY {
                values.insert(key, value);
            }
        }
        self.values = values;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lookup_returns_first_value() {
        let request = CoreRequest::new(Method::GET, "/select")
            .with_param("q", "title:rust")
            .with_param("fq", "lang:en")
            .with_param("q", "ignored");
        assert_eq!(request.param("q"), Some("title:rust"));
        assert_eq!(request.param("rows"), None);
        assert_eq!(request.param_string(), "q=title:rust&fq=lang:en&q=ignored");
    }

    #[test]
    fn response_header_is_first_and_replaced() {
        let mut response = QueryResponse::new()
            .with("docs", json!([1, 2]))
            .with(RESPONSE_HEADER_KEY, json!({"status": 99}));
        response.set_response_header(0, 12);

        let keys = response.values().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec![RESPONSE_HEADER_KEY, "docs"]);
        assert_eq!(
            response.get(RESPONSE_HEADER_KEY),
            Some(&json!({"status": 0, "QTime": 12}))
        );
    }
}
