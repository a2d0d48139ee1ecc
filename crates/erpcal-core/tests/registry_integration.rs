//! Integration tests for the query registry over the bundled offline set.

use async_trait::async_trait;
use erpcal_core::registry::{EmptyCatalog, OfflineSet, QueryRegistry, RemoteCatalog};
use erpcal_core::{QueryRegistryEntry, RegistryError};
use serde_json::json;

/// Catalog served from an in-memory snapshot of remote JSON.
struct Snapshot(Vec<QueryRegistryEntry>);

#[async_trait]
impl RemoteCatalog for Snapshot {
    async fn list(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError> {
        Ok(self.0.clone())
    }

    async fn load(&self, id: &str) -> Result<Option<QueryRegistryEntry>, RegistryError> {
        Ok(self.0.iter().find(|e| e.id == id).cloned())
    }
}

fn remote_snapshot() -> Snapshot {
    let entries: Vec<QueryRegistryEntry> = serde_json::from_value(json!([
        {
            "id": "leave-types",
            "name": "Leave Types (remote)",
            "body": "query LeaveTypes { LeaveTypes { edges { node { name is_lwp } } } }"
        },
        {
            "id": "attendance",
            "name": "Attendance",
            "body": "query Attendance { Attendances { edges { node { name status } } } }",
            "queryKeys": ["Attendances"],
            "isOffline": true
        }
    ]))
    .unwrap();
    Snapshot(entries)
}

#[tokio::test]
async fn test_offline_only_lists_bundled_set_sorted() {
    let registry = QueryRegistry::new(OfflineSet::bundled().unwrap(), EmptyCatalog);

    let ids: Vec<String> = registry
        .list_all()
        .await
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["doctor-directory", "item-catalog", "leave-types"]);
}

#[tokio::test]
async fn test_bundled_entries_pin_remote_definitions() {
    let registry = QueryRegistry::new(OfflineSet::bundled().unwrap(), remote_snapshot());

    let all = registry.list_all().await;
    let names: Vec<&str> = all.iter().map(QueryRegistryEntry::display_name).collect();
    assert_eq!(
        names,
        vec!["Attendance", "Doctor Directory", "item catalog", "Leave Types"]
    );

    // Remote claims of offline-ness are not trusted.
    let attendance = registry.load_by_id("attendance").await.unwrap();
    assert!(!attendance.is_offline);
    assert_eq!(attendance.query_keys, vec!["Attendances"]);

    let leave_types = registry.load_by_id("leave-types").await.unwrap();
    assert!(leave_types.is_offline);
    assert!(leave_types.json.is_some());
    assert_eq!(leave_types.display_name(), "Leave Types");
}

#[tokio::test]
async fn test_entry_json_uses_camel_case_and_omits_absent_fields() {
    let registry = QueryRegistry::new(OfflineSet::bundled().unwrap(), EmptyCatalog);
    let entry = registry.load_by_id("leave-types").await.unwrap();

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["isOffline"], true);
    assert_eq!(value["queryKeys"], json!(["LeaveTypes"]));
    assert!(value.get("transformerCode").is_none());
    assert!(value.get("index").is_none());
}
