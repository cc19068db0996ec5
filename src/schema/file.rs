use super::SchemaStore;
use crate::core::{Result, RouterError, TenantId};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SCHEMA_FILE_EXTENSION: &str = "xml";

/// Stores each index's schema as `<dir>/<index>.xml`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers see either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileSchemaStore {
    dir: PathBuf,
}

impl FileSchemaStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            RouterError::Config(format!(
                "Failed to create schema directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// File backing the tenant's schema, if the name is usable as a file name.
    pub fn schema_path(&self, tenant: &TenantId) -> Option<PathBuf> {
        let name = tenant.as_str();
        let usable = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        usable.then(|| self.dir.join(format!("{name}.{SCHEMA_FILE_EXTENSION}")))
    }
}

#[async_trait]
impl SchemaStore for FileSchemaStore {
    async fn read(&self, tenant: &TenantId) -> Result<String> {
        let path = self
            .schema_path(tenant)
            .ok_or_else(|| RouterError::NotFound(format!("schema for index '{}'", tenant)))?;
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(text)
    }

    async fn write(&self, tenant: &TenantId, text: &str) -> Result<()> {
        let path = self.schema_path(tenant).ok_or_else(|| {
            RouterError::WriteFailure(format!("'{}' is not a valid index name", tenant))
        })?;
        let dir = self.dir.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(text.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| RouterError::WriteFailure(format!("schema write task failed: {}", e)))?
        .map_err(|e| RouterError::WriteFailure(format!("Failed to write schema: {}", e)))
    }
}
