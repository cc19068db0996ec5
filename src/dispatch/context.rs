use crate::core::TenantId;
use std::collections::HashMap;

/// Context key holding the tenant extracted from the path.
pub const TENANT_INDEX_KEY: &str = "tenant-index";
/// Context key holding the path below the tenant segment.
pub const HANDLER_PATH_KEY: &str = "handler-path";

/// Per-request values attached by the dispatcher for downstream stages.
///
/// Travels as a request extension so later stages can select the index
/// without parsing the path again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchContext {
    values: HashMap<String, String>,
}

impl DispatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set_tenant(&mut self, tenant: TenantId) {
        self.insert(TENANT_INDEX_KEY, tenant.into_inner());
    }

    pub fn tenant(&self) -> Option<TenantId> {
        self.get(TENANT_INDEX_KEY).map(TenantId::from)
    }

    pub fn set_handler_path(&mut self, path: impl Into<String>) {
        self.insert(HANDLER_PATH_KEY, path);
    }

    pub fn handler_path(&self) -> Option<&str> {
        self.get(HANDLER_PATH_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_is_stored_under_well_known_key() {
        let mut context = DispatchContext::new();
        assert_eq!(context.tenant(), None);

        context.set_tenant(TenantId::from("books"));
        context.set_handler_path("/select");
        assert_eq!(context.get(TENANT_INDEX_KEY), Some("books"));
        assert_eq!(context.tenant(), Some(TenantId::from("books")));
        assert_eq!(context.handler_path(), Some("/select"));
    }
}
