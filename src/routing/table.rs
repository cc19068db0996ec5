use crate::core::{Result, RouterError, TenantId};
use std::collections::HashSet;

/// Top-level path segments that name endpoints rather than tenants.
///
/// A normal request whose first segment is reserved is dispatched without a
/// tenant. The table is empty by default, so every leading segment is treated
/// as a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    reserved: HashSet<String>,
}

impl RouteTable {
    pub fn new(segments: Vec<String>) -> Result<Self> {
        let mut table = Self::default();
        for segment in segments {
            table.reserve(segment)?;
        }
        Ok(table)
    }

    /// Marks a segment as an endpoint name.
    pub fn reserve(&mut self, segment: impl Into<String>) -> Result<()> {
        let segment = segment.into();
        let trimmed = segment.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(RouterError::Config(format!(
                "reserved segment '{}' must be a non-empty name without '/'",
                segment
            )));
        }
        self.reserved.insert(trimmed.to_string());
        Ok(())
    }

    /// Returns true if the segment was reserved.
    pub fn release(&mut self, segment: &str) -> bool {
        self.reserved.remove(segment)
    }

    pub fn is_reserved(&self, segment: &str) -> bool {
        self.reserved.contains(segment)
    }

    /// Keeps the tenant only if its segment is not reserved.
    pub fn admit(&self, tenant: TenantId) -> Option<TenantId> {
        if self.is_reserved(tenant.as_str()) {
            None
        } else {
            Some(tenant)
        }
    }

    pub fn reserved_segments(&self) -> Vec<String> {
        let mut segments = self.reserved.iter().cloned().collect::<Vec<_>>();
        segments.sort();
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_admits_every_segment() {
        let table = RouteTable::default();
        assert_eq!(
            table.admit(TenantId::from("select")),
            Some(TenantId::from("select"))
        );
    }

    #[test]
    fn reserved_segments_are_not_tenants() {
        let table = RouteTable::new(vec!["select".to_string(), "update".to_string()]).unwrap();
        assert_eq!(table.admit(TenantId::from("select")), None);
        assert_eq!(
            table.admit(TenantId::from("books")),
            Some(TenantId::from("books"))
        );
        assert_eq!(table.reserved_segments(), vec!["select", "update"]);
    }

    #[test]
    fn rejects_blank_or_nested_segments() {
        let mut table = RouteTable::default();
        assert!(table.reserve("  ").is_err());
        assert!(table.reserve("admin/cores").is_err());
        assert!(table.reserve(" admin ").is_ok());
        assert!(table.is_reserved("admin"));
        assert!(table.release("admin"));
        assert!(!table.is_reserved("admin"));
    }
}
