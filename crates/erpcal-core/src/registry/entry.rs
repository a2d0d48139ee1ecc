use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named query definition from either the bundled set or the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRegistryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Query text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Canned response served offline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default)]
    pub query_keys: Vec<String>,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub sort_fields: Vec<String>,
    #[serde(default)]
    pub is_offline: bool,
}

impl QueryRegistryEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            body: None,
            json: None,
            transformer_code: None,
            index: None,
            query_keys: Vec::new(),
            search_fields: Vec::new(),
            sort_fields: Vec::new(),
            is_offline: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json(mut self, json: serde_json::Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Name if set and not blank, else the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    /// Whether the entry can be served without the remote catalog.
    pub fn is_servable_offline(&self) -> bool {
        let has_body = self.body.as_deref().is_some_and(|b| !b.trim().is_empty());
        let has_json = self.json.as_ref().is_some_and(|j| !j.is_null());
        has_body && has_json
    }
}

/// Case-insensitive ordering by display name; ties fall back to the raw name.
pub(crate) fn by_display_name(a: &QueryRegistryEntry, b: &QueryRegistryEntry) -> Ordering {
    let (a, b) = (a.display_name(), b.display_name());
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
