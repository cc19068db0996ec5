//! Generic request execution behind the dispatch stage.
//!
//! Resolves the core named by the [`DispatchContext`], runs the request, stamps
//! the response header and writes the result with the writer picked by `wt`.

pub mod types;

use crate::cluster::CoreRegistry;
use crate::core::RouterError;
use crate::dispatch::DispatchContext;
use crate::web::{ResponseWriters, write_response};
use axum::Extension;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Response;
use http::{Method, StatusCode, Uri};
use std::sync::Arc;
use std::time::Instant;

pub use types::{CoreRequest, QueryResponse, RESPONSE_HEADER_KEY};

#[derive(Clone)]
pub struct ExecutionState {
    registry: Arc<dyn CoreRegistry>,
    writers: ResponseWriters,
}

impl ExecutionState {
    pub fn new(registry: Arc<dyn CoreRegistry>) -> Self {
        Self {
            registry,
            writers: ResponseWriters::default(),
        }
    }

    /// Runs one request against its core. Failures are carried in the
    /// returned response rather than as an `Err`.
    pub async fn run(&self, request: &CoreRequest) -> QueryResponse {
        let started = Instant::now();
        let mut response = match self.registry.resolve(request.tenant.as_ref()).await {
            Ok(core) => core
                .handle(request)
                .await
                .unwrap_or_else(QueryResponse::from_error),
            Err(err) => QueryResponse::from_error(err),
        };

        let status = response
            .exception()
            .map(|err| err.status().as_u16())
            .unwrap_or(0);
        let qtime = started.elapsed().as_millis() as u64;
        response.set_response_header(status, qtime);

        tracing::info!(
            tenant = request.tenant.as_ref().map(|t| t.as_str()).unwrap_or(""),
            path = %request.handler_path,
            params = %format!("{{{}}}", request.param_string()),
            status,
            qtime,
            "request executed"
        );
        response
    }
}

/// Fallback handler that receives every request the dispatcher passes on.
pub async fn execute(
    State(state): State<ExecutionState>,
    method: Method,
    uri: Uri,
    context: Option<Extension<DispatchContext>>,
    body: Bytes,
) -> Response {
    let context = context.map(|Extension(context)| context).unwrap_or_default();
    let handler_path = context
        .handler_path()
        .map(str::to_string)
        .unwrap_or_else(|| uri.path().to_string());

    let mut request = CoreRequest::new(method.clone(), handler_path).with_body(body);
    request.tenant = context.tenant();

    let response = match Query::<Vec<(String, String)>>::try_from_uri(&uri) {
        Ok(Query(params)) => {
            request.params = params;
            state.run(&request).await
        }
        Err(rejection) => QueryResponse::from_error(RouterError::handler(
            StatusCode::BAD_REQUEST,
            rejection.body_text(),
        )),
    };

    let writer = state.writers.resolve(request.param("wt"));
    write_response(&method, &request, &response, writer.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{CoreHandler, DiagnosticCore, InMemoryCoreRegistry};
    use crate::core::{Result, TenantId};
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingCore;

    #[async_trait]
    impl CoreHandler for FailingCore {
        async fn handle(&self, _request: &CoreRequest) -> Result<QueryResponse> {
            Err(RouterError::handler(StatusCode::BAD_REQUEST, "undefined field"))
        }
    }

    async fn registry() -> Arc<InMemoryCoreRegistry> {
        let registry = InMemoryCoreRegistry::new();
        registry
            .register("books", Arc::new(DiagnosticCore::new("books")))
            .await
            .unwrap();
        registry
            .register("broken", Arc::new(FailingCore))
            .await
            .unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn run_stamps_success_header() {
        let state = ExecutionState::new(registry().await);
        let request = CoreRequest::new(Method::GET, "/select").with_tenant(TenantId::from("books"));
        let response = state.run(&request).await;

        assert!(response.exception().is_none());
        let header = response.get(RESPONSE_HEADER_KEY).unwrap();
        assert_eq!(header["status"], json!(0));
        assert!(header["QTime"].is_u64());
        assert_eq!(response.get("handler"), Some(&json!("/select")));
    }

    #[tokio::test]
    async fn run_carries_core_failures() {
        let state = ExecutionState::new(registry().await);
        let request =
            CoreRequest::new(Method::GET, "/select").with_tenant(TenantId::from("broken"));
        let response = state.run(&request).await;

        assert_eq!(
            response.exception().map(RouterError::status),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(response.get(RESPONSE_HEADER_KEY).unwrap()["status"], json!(400));
    }

    #[tokio::test]
    async fn run_reports_unknown_core_as_not_found() {
        let state = ExecutionState::new(registry().await);
        let request = CoreRequest::new(Method::GET, "/select").with_tenant(TenantId::from("nope"));
        let response = state.run(&request).await;
        assert_eq!(
            response.exception().map(RouterError::status),
            Some(StatusCode::NOT_FOUND)
        );
    }
}
