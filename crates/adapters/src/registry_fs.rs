//! Filesystem cache store: registry records plus snapshot bodies
//!
//! Layout under the cache directory:
//! - `registry.json`: identifier-keyed resource records
//! - `snapshots/<id>.html`: last stored body per resource
//! - `backup/`: full copy of both, refreshed before each mutating run

use async_trait::async_trait;
use pagewatch_domain::{RegistryStore, Resource, ResourceId, StoreError};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const REGISTRY_FILE: &str = "registry.json";
const SNAPSHOT_DIR: &str = "snapshots";
const BACKUP_DIR: &str = "backup";

/// Filesystem-backed registry and snapshot store
pub struct FsRegistryStore {
    cache_dir: PathBuf,
}

impl FsRegistryStore {
    /// Open a store rooted at `cache_dir`, creating the layout if needed
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(cache_dir.join(SNAPSHOT_DIR))
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(Self { cache_dir })
    }

    fn registry_path(&self) -> PathBuf {
        self.cache_dir.join(REGISTRY_FILE)
    }

    fn snapshot_path(&self, id: &ResourceId) -> PathBuf {
        self.cache_dir
            .join(SNAPSHOT_DIR)
            .join(format!("{}.html", id))
    }
}

#[async_trait]
impl RegistryStore for FsRegistryStore {
    async fn load(&self) -> Result<Vec<Resource>, StoreError> {
        let path = self.registry_path();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let records: BTreeMap<String, Resource> =
            serde_json::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(records.into_values().collect())
    }

    async fn save(&self, resources: &[Resource]) -> Result<(), StoreError> {
        let records: BTreeMap<&str, &Resource> = resources
            .iter()
            .map(|resource| (resource.id.as_str(), resource))
            .collect();

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tokio::fs::write(self.registry_path(), json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn read_snapshot(&self, id: &ResourceId) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.snapshot_path(id)).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn write_snapshot(&self, id: &ResourceId, body: &str) -> Result<(), StoreError> {
        tokio::fs::write(self.snapshot_path(id), body)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn delete_snapshot(&self, id: &ResourceId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.snapshot_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn backup(&self) -> Result<(), StoreError> {
        let backup_dir = self.cache_dir.join(BACKUP_DIR);
        let backup_snapshots = backup_dir.join(SNAPSHOT_DIR);
        tokio::fs::create_dir_all(&backup_snapshots)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let registry = self.registry_path();
        if tokio::fs::try_exists(&registry)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            tokio::fs::copy(&registry, backup_dir.join(REGISTRY_FILE))
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let mut entries = tokio::fs::read_dir(self.cache_dir.join(SNAPSHOT_DIR))
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.is_file() {
                let Some(file_name) = path.file_name() else {
                    continue;
                };
                tokio::fs::copy(&path, backup_snapshots.join(file_name))
                    .await
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewatch_domain::CheckStatus;
    use tempfile::TempDir;
    use time::OffsetDateTime;

    fn sample_resource() -> Resource {
        let mut resource = Resource::new("Example", "http://example.com/");
        resource.status = CheckStatus::Checked(200);
        resource.content_hash = Some("abc123".to_string());
        resource.updated_at = Some(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap());
        resource.log = "Page B ---- http://x/b".to_string();
        resource
    }

    #[tokio::test]
    async fn load_on_fresh_cache_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistryStore::new(dir.path()).unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_roundtrips_all_fields() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistryStore::new(dir.path()).unwrap();

        let resource = sample_resource();
        store.save(std::slice::from_ref(&resource)).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, resource.id);
        assert_eq!(loaded[0].name, resource.name);
        assert_eq!(loaded[0].url, resource.url);
        assert_eq!(loaded[0].status, resource.status);
        assert_eq!(loaded[0].content_hash, resource.content_hash);
        assert_eq!(loaded[0].updated_at, resource.updated_at);
        assert_eq!(loaded[0].log, resource.log);
    }

    #[tokio::test]
    async fn snapshot_roundtrip_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistryStore::new(dir.path()).unwrap();
        let id = ResourceId::from_url("http://example.com/");

        assert!(store.read_snapshot(&id).await.unwrap().is_none());

        store.write_snapshot(&id, "<html>body</html>").await.unwrap();
        assert_eq!(
            store.read_snapshot(&id).await.unwrap().as_deref(),
            Some("<html>body</html>")
        );

        store.delete_snapshot(&id).await.unwrap();
        assert!(store.read_snapshot(&id).await.unwrap().is_none());

        // Deleting an already-absent snapshot is not an error.
        store.delete_snapshot(&id).await.unwrap();
    }

    #[tokio::test]
    async fn backup_copies_registry_and_snapshots() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistryStore::new(dir.path()).unwrap();

        let resource = sample_resource();
        store.save(std::slice::from_ref(&resource)).await.unwrap();
        store.write_snapshot(&resource.id, "cached body").await.unwrap();

        store.backup().await.unwrap();

        let backup_registry = dir.path().join("backup").join("registry.json");
        assert!(backup_registry.exists());

        let backup_snapshot = dir
            .path()
            .join("backup")
            .join("snapshots")
            .join(format!("{}.html", resource.id));
        assert_eq!(std::fs::read_to_string(backup_snapshot).unwrap(), "cached body");
    }

    #[tokio::test]
    async fn backup_on_empty_cache_succeeds() {
        let dir = TempDir::new().unwrap();
        let store = FsRegistryStore::new(dir.path()).unwrap();

        store.backup().await.unwrap();
    }
}
