use crate::core::{Result, RouterError, ShardTopology};
use crate::routing::RouteTable;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default upper bound for a buffered schema upload (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Settings the dispatcher is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Global prefix stripped from normal paths before tenant extraction.
    pub path_prefix: String,

    /// Leading segments that are endpoints, not tenants.
    pub route_table: RouteTable,

    /// Largest schema body accepted on PUT/POST.
    pub max_body_bytes: usize,
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self {
            path_prefix: String::new(),
            route_table: RouteTable::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = prefix.to_string();
        self
    }

    pub fn route_table(mut self, table: RouteTable) -> Self {
        self.route_table = table;
        self
    }

    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Router process configuration
///
/// Loaded from an optional JSON file; command-line flags override it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,

    /// Global path prefix (empty for none)
    pub path_prefix: String,

    /// Path segments never treated as tenants
    pub reserved_segments: Vec<String>,

    /// Maximum buffered schema body
    pub max_body_bytes: usize,

    /// Directory for file-backed schemas; in-memory when unset
    pub schema_dir: Option<PathBuf>,

    /// JSON topology file re-read on every ping; `topology` is used when unset
    pub topology_file: Option<PathBuf>,

    /// Static topology
    pub topology: ShardTopology,

    /// Cores served by the built-in diagnostic handler
    pub cores: Vec<String>,

    /// Core used when the path names no tenant
    pub default_core: Option<String>,
}

impl RouterConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            path_prefix: String::new(),
            reserved_segments: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            schema_dir: None,
            topology_file: None,
            topology: ShardTopology::default(),
            cores: Vec::new(),
            default_core: None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| {
            RouterError::Config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_slice(&raw).map_err(|e| {
            RouterError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }

    pub fn path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = prefix.to_string();
        self
    }

    pub fn reserve_segment(mut self, segment: &str) -> Self {
        self.reserved_segments.push(segment.to_string());
        self
    }

    pub fn schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    pub fn topology_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.topology_file = Some(path.into());
        self
    }

    pub fn topology(mut self, topology: ShardTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn core(mut self, name: &str) -> Self {
        self.cores.push(name.to_string());
        self
    }

    pub fn default_core(mut self, name: &str) -> Self {
        self.default_core = Some(name.to_string());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.path_prefix.is_empty() && !self.path_prefix.starts_with('/') {
            return Err(RouterError::Config(format!(
                "path_prefix '{}' must start with '/'",
                self.path_prefix
            )));
        }

        if self.max_body_bytes == 0 {
            return Err(RouterError::Config(
                "max_body_bytes must be > 0".to_string(),
            ));
        }

        if let Some(default_core) = &self.default_core {
            if !self.cores.contains(default_core) {
                return Err(RouterError::Config(format!(
                    "default_core '{}' is not listed in cores",
                    default_core
                )));
            }
        }

        Ok(())
    }

    pub fn dispatch_config(&self) -> Result<DispatchConfig> {
        self.validate()?;
        Ok(DispatchConfig::new()
            .path_prefix(&self.path_prefix)
            .route_table(RouteTable::new(self.reserved_segments.clone())?)
            .max_body_bytes(self.max_body_bytes))
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8983)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.bind.port(), 8983);
        assert!(config.path_prefix.is_empty());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RouterConfig::default()
            .path_prefix("/solr")
            .reserve_segment("admin")
            .core("books")
            .default_core("books");

        let dispatch = config.dispatch_config().unwrap();
        assert_eq!(dispatch.path_prefix, "/solr");
        assert!(dispatch.route_table.is_reserved("admin"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RouterConfig::default().path_prefix("solr").validate().is_err());
        assert!(RouterConfig::default().default_core("ghost").validate().is_err());

        let mut config = RouterConfig::default();
        config.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("router.json");
        std::fs::write(
            &path,
            r#"{
                "bind": "0.0.0.0:9000",
                "reserved_segments": ["select"],
                "topology": {"shard_count": 3, "replicas_per_shard": 2, "hosts": ["a", "b"]}
            }"#,
        )
        .unwrap();

        let config = RouterConfig::from_file(&path).unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.topology.shard_count, 3);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(config.schema_dir.is_none());
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let err = RouterConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
