use crate::core::{Result, RouterError, TenantId};
use crate::execution::{CoreRequest, QueryResponse};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Executes requests against one index.
#[async_trait]
pub trait CoreHandler: Send + Sync {
    async fn handle(&self, request: &CoreRequest) -> Result<QueryResponse>;
}

/// Maps index names to the handler serving them.
#[async_trait]
pub trait CoreRegistry: Send + Sync {
    /// Resolves the tenant's core. `None` asks for the default core.
    async fn resolve(&self, tenant: Option<&TenantId>) -> Result<Arc<dyn CoreHandler>>;
}

#[derive(Clone, Default)]
pub struct InMemoryCoreRegistry {
    cores: Arc<RwLock<HashMap<TenantId, Arc<dyn CoreHandler>>>>,
    default_core: Option<TenantId>,
}

impl InMemoryCoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core used for requests whose path names no tenant.
    pub fn with_default_core(mut self, tenant: impl Into<TenantId>) -> Self {
        self.default_core = Some(tenant.into());
        self
    }

    pub async fn register(
        &self,
        tenant: impl Into<TenantId>,
        handler: Arc<dyn CoreHandler>,
    ) -> Result<()> {
        let tenant = tenant.into();
        if tenant.is_empty() {
            return Err(RouterError::Config(
                "core name must not be empty".to_string(),
            ));
        }
        self.cores.write().await.insert(tenant, handler);
        Ok(())
    }

    pub async fn unregister(&self, tenant: &TenantId) -> bool {
        self.cores.write().await.remove(tenant).is_some()
    }

    pub async fn core_names(&self) -> Vec<TenantId> {
        let mut names = self.cores.read().await.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }
}

#[async_trait]
impl CoreRegistry for InMemoryCoreRegistry {
    async fn resolve(&self, tenant: Option<&TenantId>) -> Result<Arc<dyn CoreHandler>> {
        let Some(name) = tenant.or(self.default_core.as_ref()) else {
            return Err(RouterError::NotFound(
                "no index named in path and no default core configured".to_string(),
            ));
        };
        let cores = self.cores.read().await;
        cores
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::NotFound(format!("core '{}'", name)))
    }
}

/// Stand-in core that reports what it was asked to do.
///
/// Used by the binary until a real engine is attached, and by tests.
#[derive(Debug, Clone)]
pub struct DiagnosticCore {
    name: String,
}

impl DiagnosticCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl CoreHandler for DiagnosticCore {
    async fn handle(&self, request: &CoreRequest) -> Result<QueryResponse> {
        let params = request
            .params
            .iter()
            .map(|(key, value)| (key.clone(), json!(value)))
            .collect::<serde_json::Map<_, _>>();
        Ok(QueryResponse::new()
            .with("core", json!(self.name))
            .with(
                "tenant",
                json!(request.tenant.as_ref().map(TenantId::as_str)),
            )
            .with("handler", json!(request.handler_path))
            .with("method", json!(request.method.as_str()))
            .with("params", serde_json::Value::Object(params))
            .with("bodyBytes", json!(request.body.len())))
    }
}
