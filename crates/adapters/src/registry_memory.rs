//! In-memory cache store for testing and ad-hoc runs

use async_trait::async_trait;
use pagewatch_domain::{RegistryStore, Resource, ResourceId, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory registry and snapshot store
pub struct InMemoryRegistryStore {
    resources: RwLock<Vec<Resource>>,
    snapshots: RwLock<HashMap<String, String>>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(Vec::new()),
            snapshots: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn load(&self) -> Result<Vec<Resource>, StoreError> {
        let resources = self
            .resources
            .read()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(resources.clone())
    }

    async fn save(&self, resources: &[Resource]) -> Result<(), StoreError> {
        let mut stored = self
            .resources
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        *stored = resources.to_vec();
        Ok(())
    }

    async fn read_snapshot(&self, id: &ResourceId) -> Result<Option<String>, StoreError> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(snapshots.get(id.as_str()).cloned())
    }

    async fn write_snapshot(&self, id: &ResourceId, body: &str) -> Result<(), StoreError> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        snapshots.insert(id.to_string(), body.to_string());
        Ok(())
    }

    async fn delete_snapshot(&self, id: &ResourceId) -> Result<(), StoreError> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        snapshots.remove(id.as_str());
        Ok(())
    }

    async fn backup(&self) -> Result<(), StoreError> {
        // Nothing durable to back up.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_roundtrip() {
        let store = InMemoryRegistryStore::new();
        let resource = Resource::new("Example", "http://example.com/");

        store.save(std::slice::from_ref(&resource)).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, resource.id);
    }

    #[tokio::test]
    async fn snapshot_roundtrip() {
        let store = InMemoryRegistryStore::new();
        let id = ResourceId::from_url("http://example.com/");

        assert!(store.read_snapshot(&id).await.unwrap().is_none());
        store.write_snapshot(&id, "body").await.unwrap();
        assert_eq!(store.read_snapshot(&id).await.unwrap().as_deref(), Some("body"));
        store.delete_snapshot(&id).await.unwrap();
        assert!(store.read_snapshot(&id).await.unwrap().is_none());
    }
}
