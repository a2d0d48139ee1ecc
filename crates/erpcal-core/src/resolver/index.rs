//! O(1) lookup tables over employee and doctor option lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::identity::normalize_email;

/// One row of an option list as delivered by the fetch layer.
///
/// `value` is the record id and `label` its display name; everything else
/// the fetcher sends (role, city, coordinates, notes...) lands in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl OptionRecord {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            email: None,
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Email if present and not blank.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Which reference list an index was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Employees are also addressable by email.
    Employee,
    Doctor,
}

/// Read-only lookup structure built once per option list.
///
/// Email keys are trimmed and lowercased. When two rows share a normalized
/// email the later row wins; the collision is logged at debug level.
#[derive(Debug, Clone)]
pub struct ResolverIndex {
    kind: IndexKind,
    source: Arc<Vec<OptionRecord>>,
    by_id: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

impl ResolverIndex {
    /// Build an index over `source`. O(n).
    pub fn build(kind: IndexKind, source: Arc<Vec<OptionRecord>>) -> Self {
        let mut by_id = HashMap::with_capacity(source.len());
        let mut by_email = HashMap::new();

        for (pos, record) in source.iter().enumerate() {
            by_id.insert(record.value.clone(), pos);

            if kind != IndexKind::Employee {
                continue;
            }
            if let Some(email) = record.email() {
                if let Some(prev) = by_email.insert(normalize_email(email), pos) {
                    tracing::debug!(
                        email,
                        shadowed = %source[prev].value,
                        winner = %record.value,
                        "duplicate employee email, keeping the later row"
                    );
                }
            }
        }

        Self {
            kind,
            source,
            by_id,
            by_email,
        }
    }

    pub fn employees(list: Vec<OptionRecord>) -> Self {
        Self::build(IndexKind::Employee, Arc::new(list))
    }

    pub fn doctors(list: Vec<OptionRecord>) -> Self {
        Self::build(IndexKind::Doctor, Arc::new(list))
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// The list this index was built from.
    pub fn source(&self) -> &Arc<Vec<OptionRecord>> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OptionRecord> {
        self.by_id.get(id).map(|&pos| &self.source[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn id_to_name(&self, id: &str) -> Option<&str> {
        self.get(id).map(|r| r.label.as_str())
    }

    pub fn id_to_email(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(OptionRecord::email)
    }

    /// Domain field of a record, e.g. `"city"` or `"roleId"`.
    pub fn id_to_field(&self, id: &str, field: &str) -> Option<&serde_json::Value> {
        self.get(id).and_then(|r| r.fields.get(field))
    }

    fn by_email(&self, email: &str) -> Option<&OptionRecord> {
        self.by_email
            .get(&normalize_email(email))
            .map(|&pos| &self.source[pos])
    }

    /// Always `None` for doctor indexes.
    pub fn email_to_id(&self, email: &str) -> Option<&str> {
        self.by_email(email).map(|r| r.value.as_str())
    }

    /// Always `None` for doctor indexes.
    pub fn email_to_name(&self, email: &str) -> Option<&str> {
        self.by_email(email).map(|r| r.label.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &OptionRecord> {
        self.source.iter()
    }
}

/// Holds the index for one reference list and rebuilds it whenever the
/// caller hands over a different list.
///
/// List identity is `Arc` pointer identity: passing the same `Arc` again is
/// a no-op, passing a new one (even with equal contents) rebuilds.
#[derive(Debug)]
pub struct ResolverCache {
    kind: IndexKind,
    index: Option<ResolverIndex>,
    rebuilds: usize,
}

impl ResolverCache {
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            index: None,
            rebuilds: 0,
        }
    }

    /// Index for `list`, rebuilding if `list` is not the one last seen.
    pub fn sync(&mut self, list: &Arc<Vec<OptionRecord>>) -> &ResolverIndex {
        if self
            .index
            .as_ref()
            .is_some_and(|index| !Arc::ptr_eq(index.source(), list))
        {
            self.index = None;
        }

        let kind = self.kind;
        let rebuilds = &mut self.rebuilds;
        self.index.get_or_insert_with(|| {
            *rebuilds += 1;
            tracing::debug!(?kind, rows = list.len(), "rebuilding resolver index");
            ResolverIndex::build(kind, Arc::clone(list))
        })
    }

    /// Index from the last `sync`, if any.
    pub fn current(&self) -> Option<&ResolverIndex> {
        self.index.as_ref()
    }

    /// Number of full rebuilds performed so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}
