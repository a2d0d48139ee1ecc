//! Tests for the query registry merge.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeCatalog {
        entries: Vec<QueryRegistryEntry>,
        fail: bool,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl RemoteCatalog for FakeCatalog {
        async fn list(&self) -> Result<Vec<QueryRegistryEntry>, RegistryError> {
            if self.fail {
                return Err(RegistryError::Remote("catalog unreachable".into()));
            }
            Ok(self.entries.clone())
        }

        async fn load(&self, id: &str) -> Result<Option<QueryRegistryEntry>, RegistryError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.iter().find(|e| e.id == id).cloned())
        }
    }

    fn offline(id: &str, name: &str) -> QueryRegistryEntry {
        QueryRegistryEntry::new(id)
            .with_name(name)
            .with_body("query { x }")
            .with_json(json!({"x": 1}))
    }

    fn remote(id: &str, name: &str) -> QueryRegistryEntry {
        QueryRegistryEntry::new(id).with_name(name).with_body("query { y }")
    }

    fn names(list: &[QueryRegistryEntry]) -> Vec<&str> {
        list.iter().map(QueryRegistryEntry::display_name).collect()
    }

    #[tokio::test]
    async fn test_list_all_merges_and_sorts_by_name() {
        let registry = QueryRegistry::new(
            OfflineSet::from_entries([offline("a", "A"), offline("c", "C")]),
            FakeCatalog {
                entries: vec![remote("b", "B")],
                ..Default::default()
            },
        );

        let all = registry.list_all().await;
        assert_eq!(names(&all), vec!["A", "B", "C"]);
        assert_eq!(
            all.iter().map(|e| e.is_offline).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[tokio::test]
    async fn test_sort_ignores_case_and_falls_back_to_id() {
        let registry = QueryRegistry::new(
            OfflineSet::from_entries([offline("z-offline", "beta")]),
            FakeCatalog {
                entries: vec![
                    remote("Alpha", ""),
                    QueryRegistryEntry::new("gamma"),
                    remote("delta-id", "Delta"),
                ],
                ..Default::default()
            },
        );

        let all = registry.list_all().await;
        assert_eq!(names(&all), vec!["Alpha", "beta", "Delta", "gamma"]);
    }

    #[tokio::test]
    async fn test_offline_entry_wins_id_collision() {
        let registry = QueryRegistry::new(
            OfflineSet::from_entries([offline("shared", "Pinned")]),
            FakeCatalog {
                entries: vec![remote("shared", "Stale"), remote("other", "Other")],
                ..Default::default()
            },
        );

        let all = registry.list_all().await;
        assert_eq!(names(&all), vec!["Other", "Pinned"]);

        let loaded = registry.load_by_id("shared").await.unwrap();
        assert_eq!(loaded.display_name(), "Pinned");
        assert!(loaded.is_offline);
        assert_eq!(registry.remote.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_entries_without_body_or_json_stay_remote() {
        let incomplete = QueryRegistryEntry::new("half").with_body("query { z }");
        let set = OfflineSet::from_entries([
            incomplete,
            QueryRegistryEntry::new("null-json")
                .with_body("query { z }")
                .with_json(serde_json::Value::Null),
            offline("full", "Full"),
        ]);
        assert_eq!(set.len(), 1);

        let registry = QueryRegistry::new(
            set,
            FakeCatalog {
                entries: vec![remote("half", "Half")],
                ..Default::default()
            },
        );

        let loaded = registry.load_by_id("half").await.unwrap();
        assert!(!loaded.is_offline);
        assert_eq!(registry.remote.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let registry = QueryRegistry::new(OfflineSet::default(), EmptyCatalog);
        let err = registry.load_by_id("nope").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_remote_failure_still_lists_offline_entries() {
        let registry = QueryRegistry::new(
            OfflineSet::from_entries([offline("c", "C"), offline("a", "A")]),
            FakeCatalog {
                entries: vec![remote("b", "B")],
                fail: true,
                ..Default::default()
            },
        );

        let all = registry.list_all().await;
        assert_eq!(names(&all), vec!["A", "C"]);
        assert!(all.iter().all(|e| e.is_offline));

        let loaded = registry.load_by_id("a").await.unwrap();
        assert!(loaded.is_offline);
    }

    #[test]
    fn test_bundled_set_parses_and_filters() {
        let set = OfflineSet::bundled().unwrap();

        assert!(set.contains("doctor-directory"));
        assert!(set.contains("item-catalog"));
        assert!(!set.contains("territory-sales"));
        assert!(set.entries().iter().all(|e| e.is_offline));
        assert_eq!(
            set.get("item-catalog").and_then(|e| e.transformer_code.as_deref()),
            Some("return data.Items.edges.map(e => e.node);")
        );
    }

    #[test]
    fn test_duplicate_offline_ids_keep_first() {
        let set = OfflineSet::from_entries([offline("a", "First"), offline("a", "Second")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").map(QueryRegistryEntry::display_name), Some("First"));
    }
}
