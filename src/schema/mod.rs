//! Per-index schema documents.
//!
//! The router treats schema text as opaque. Stores own persistence and make
//! a write visible all at once.

pub mod file;

use crate::core::{Result, RouterError, TenantId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use file::FileSchemaStore;

#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Current schema text, or `NotFound`.
    async fn read(&self, tenant: &TenantId) -> Result<String>;

    /// Replaces the schema text.
    async fn write(&self, tenant: &TenantId, text: &str) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct InMemorySchemaStore {
    documents: Arc<RwLock<HashMap<TenantId, String>>>,
}

impl InMemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl SchemaStore for InMemorySchemaStore {
    async fn read(&self, tenant: &TenantId) -> Result<String> {
        let documents = self.documents.read().await;
        documents
            .get(tenant)
            .cloned()
            .ok_or_else(|| RouterError::NotFound(format!("schema for index '{}'", tenant)))
    }

    async fn write(&self, tenant: &TenantId, text: &str) -> Result<()> {
        if tenant.is_empty() {
            return Err(RouterError::WriteFailure(
                "schema write requires an index name".to_string(),
            ));
        }
        let mut documents = self.documents.write().await;
        documents.insert(tenant.clone(), text.to_string());
        Ok(())
    }
}
