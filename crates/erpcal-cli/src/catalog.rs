//! Remote query catalog backed by a JSON file.

use async_trait::async_trait;
use erpcal_core::registry::{QueryRegistryEntry, RemoteCatalog};
use erpcal_core::RegistryError;
use std::path::PathBuf;

/// Reads the catalog file on every call; no path means an empty catalog.
pub struct JsonFileCatalog {
    path: Option<PathBuf>,
}

impl JsonFileCatalog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    async fn read(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        tracing::debug!(path = %path.display(), "reading query catalog");
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RegistryError::Remote(Box::new(e)))?;
        serde_json::from_str(&text).map_err(|e| RegistryError::Remote(Box::new(e)))
    }
}

#[async_trait]
impl RemoteCatalog for JsonFileCatalog {
    async fn list(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError> {
        self.read().await
    }

    async fn load(&self, id: &str) -> Result<Option<QueryRegistryEntry>, RegistryError> {
        Ok(self.read().await?.into_iter().find(|e| e.id == id))
    }
}
