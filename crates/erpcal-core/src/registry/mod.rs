//! Query registry: bundled offline definitions merged with a remote catalog.
//!
//! Offline entries take precedence. `load_by_id` only asks the remote
//! catalog on an offline miss, and `list_all` drops remote entries whose id
//! is already served offline, and falls back to the offline set alone when
//! the remote catalog fails. The remote side is fetched on every call;
//! callers that want caching wrap their [`RemoteCatalog`].

pub mod entry;
pub mod offline;

#[cfg(test)]
mod registry_tests;

use async_trait::async_trait;

use crate::error::RegistryError;
pub use entry::QueryRegistryEntry;
pub use offline::OfflineSet;

/// Accessor for the remote query catalog.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError>;

    /// `Ok(None)` when the catalog has no such query.
    async fn load(&self, id: &str) -> Result<Option<QueryRegistryEntry>, RegistryError>;
}

/// Catalog with nothing in it, for running offline only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

#[async_trait]
impl RemoteCatalog for EmptyCatalog {
    async fn list(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError> {
        Ok(Vec::new())
    }

    async fn load(&self, _id: &str) -> Result<Option<QueryRegistryEntry>, RegistryError> {
        Ok(None)
    }
}

pub struct QueryRegistry<R> {
    offline: OfflineSet,
    remote: R,
}

impl<R: RemoteCatalog> QueryRegistry<R> {
    pub fn new(offline: OfflineSet, remote: R) -> Self {
        Self { offline, remote }
    }

    pub fn offline(&self) -> &OfflineSet {
        &self.offline
    }

    /// Every query from both sources, sorted case-insensitively by display
    /// name. Offline entries come first among equal names.
    ///
    /// A failing remote catalog is logged and leaves the offline set as the
    /// whole listing.
    pub async fn list_all(&self) -> Vec<QueryRegistryEntry> {
        let remote = match self.remote.list().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "remote query catalog unavailable, listing offline entries only");
                Vec::new()
            }
        };

        let mut all = self.offline.entries().to_vec();
        all.reserve(remote.len());
        for mut entry in remote {
            if self.offline.contains(&entry.id) {
                tracing::debug!(id = %entry.id, "remote query shadowed by offline entry");
                continue;
            }
            entry.is_offline = false;
            all.push(entry);
        }

        all.sort_by(entry::by_display_name);
        all
    }

    /// Load one query, offline first.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] when neither source has `id`, or
    /// the remote catalog's failure.
    pub async fn load_by_id(&self, id: &str) -> Result<QueryRegistryEntry, RegistryError> {
        if let Some(entry) = self.offline.get(id) {
            return Ok(entry.clone());
        }
        match self.remote.load(id).await? {
            Some(mut entry) => {
                entry.is_offline = false;
                Ok(entry)
            }
            None => Err(RegistryError::NotFound(id.to_string())),
        }
    }
}
