use crate::core::{Result, RouterError, ShardTopology};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the cluster shard layout served by `/ping`.
///
/// Every call may fetch live state; callers must not assume caching.
#[async_trait]
pub trait ShardTopologyProvider: Send + Sync {
    async fn topology(&self) -> Result<ShardTopology>;
}

/// In-process topology whose host membership can change at runtime.
#[derive(Clone, Default)]
pub struct StaticTopologyProvider {
    inner: Arc<RwLock<ShardTopology>>,
}

impl StaticTopologyProvider {
    pub fn new(topology: ShardTopology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(topology)),
        }
    }

    /// Adds a host to the end of the host list. Already-known hosts are ignored.
    pub async fn add_host(&self, host: impl Into<String>) -> Result<()> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(RouterError::Config(
                "topology host must not be empty".to_string(),
            ));
        }
        let mut topology = self.inner.write().await;
        if !topology.hosts.contains(&host) {
            topology.hosts.push(host);
        }
        Ok(())
    }

    /// Removes a host from the list.
    ///
    /// Returns true if the host was present.
    pub async fn remove_host(&self, host: &str) -> bool {
        let mut topology = self.inner.write().await;
        let before = topology.hosts.len();
        topology.hosts.retain(|known| known != host);
        topology.hosts.len() != before
    }

    pub async fn set_layout(&self, shard_count: u32, replicas_per_shard: u32) {
        let mut topology = self.inner.write().await;
        topology.shard_count = shard_count;
        topology.replicas_per_shard = replicas_per_shard;
    }
}

#[async_trait]
impl ShardTopologyProvider for StaticTopologyProvider {
    async fn topology(&self) -> Result<ShardTopology> {
        Ok(self.inner.read().await.clone())
    }
}

/// Reads the topology from a JSON file on every call.
///
/// The file holds a serialized [`ShardTopology`]. A missing or unreadable file
/// surfaces as an error, which the ping endpoint reports as 404.
#[derive(Debug, Clone)]
pub struct FileTopologyProvider {
    path: PathBuf,
}

impl FileTopologyProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ShardTopologyProvider for FileTopologyProvider {
    async fn topology(&self) -> Result<ShardTopology> {
        let raw = tokio::fs::read(&self.path).await?;
        let topology = serde_json::from_slice(&raw)?;
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn static_provider_tracks_membership() {
        let provider = StaticTopologyProvider::new(ShardTopology::new(2, 1, vec![]));
        provider.add_host("node-a:8983").await.unwrap();
        provider.add_host("node-b:8983").await.unwrap();
        provider.add_host("node-a:8983").await.unwrap();
        assert!(provider.add_host(" ").await.is_err());

        let topology = provider.topology().await.unwrap();
        assert_eq!(topology.hosts, vec!["node-a:8983", "node-b:8983"]);

        assert!(provider.remove_host("node-a:8983").await);
        assert!(!provider.remove_host("node-a:8983").await);
        provider.set_layout(4, 3).await;

        let topology = provider.topology().await.unwrap();
        assert_eq!(topology, ShardTopology::new(4, 3, vec!["node-b:8983".to_string()]));
    }

    #[tokio::test]
    async fn file_provider_rereads_on_every_call() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topology.json");
        let provider = FileTopologyProvider::new(&path);

        assert!(matches!(
            provider.topology().await,
            Err(RouterError::NotFound(_))
        ));

        std::fs::write(
            &path,
            r#"{"shard_count": 3, "replicas_per_shard": 2, "hosts": ["a", "b"]}"#,
        )
        .unwrap();
        let first = provider.topology().await.unwrap();
        assert_eq!(first.shard_count, 3);

        std::fs::write(
            &path,
            r#"{"shard_count": 5, "replicas_per_shard": 2, "hosts": ["a"]}"#,
        )
        .unwrap();
        let second = provider.topology().await.unwrap();
        assert_eq!(second.shard_count, 5);
        assert_eq!(second.hosts, vec!["a"]);
    }

    #[tokio::test]
    async fn file_provider_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topology.json");
        std::fs::write(&path, "not json").unwrap();
        let provider = FileTopologyProvider::new(&path);
        assert!(matches!(
            provider.topology().await,
            Err(RouterError::Serialization(_))
        ));
    }
}
