use std::collections::HashMap;

use super::entry::QueryRegistryEntry;
use crate::error::RegistryError;

const BUNDLED: &str = include_str!("../../queries/offline.json");

/// Immutable set of query definitions that can be served without the
/// remote catalog.
#[derive(Debug, Clone, Default)]
pub struct OfflineSet {
    entries: Vec<QueryRegistryEntry>,
    by_id: HashMap<String, usize>,
}

impl OfflineSet {
    /// The set compiled into the crate.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidBundle`] if the bundled file is not a
    /// JSON array of entries.
    pub fn bundled() -> Result<Self, RegistryError> {
        let entries: Vec<QueryRegistryEntry> =
            serde_json::from_str(BUNDLED).map_err(RegistryError::InvalidBundle)?;
        Ok(Self::from_entries(entries))
    }

    /// Build a set from `entries`, keeping only those with both a body and a
    /// canned response. A repeated id keeps its first entry.
    pub fn from_entries(entries: impl IntoIterator<Item = QueryRegistryEntry>) -> Self {
        let mut set = Self::default();
        for mut entry in entries {
            if !entry.is_servable_offline() {
                tracing::debug!(id = %entry.id, "offline query lacks body or json; skipped");
                continue;
            }
            if set.by_id.contains_key(&entry.id) {
                tracing::warn!(id = %entry.id, "duplicate offline query id; keeping the first");
                continue;
            }
            entry.is_offline = true;
            set.by_id.insert(entry.id.clone(), set.entries.len());
            set.entries.push(entry);
        }
        set
    }

    pub fn get(&self, id: &str) -> Option<&QueryRegistryEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn entries(&self) -> &[QueryRegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
