//! Integration tests for the save/delete lifecycle hooks.
//!
//! These tests use the real FlexService with an in-memory search client and
//! an in-memory entity store that share one event log, so the order of
//! persistence and index writes can be asserted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use flex_repository::indexable::hydrate_from_source;
use flex_repository::{EntityStore, FlexConfig, FlexError, FlexService, Indexable, SearchClient};
use flex_shared::{
    BulkOperation, BulkResponse, DocumentAddress, DocumentKey, FieldValue, Fields, IndexTarget,
    WriteOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

type EventLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Article {
    id: Option<i64>,
    title: String,
    #[serde(default, with = "flex_shared::canonical_date_time::option")]
    published_at: Option<NaiveDateTime>,
    #[serde(skip)]
    saved_title: Option<String>,
}

impl Article {
    fn draft(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }
}

impl Indexable for Article {
    fn table(&self) -> &str {
        "articles"
    }

    fn key(&self) -> Option<DocumentKey> {
        self.id.map(DocumentKey::from)
    }

    fn attributes(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), self.id.into());
        fields.insert("title".to_string(), self.title.clone().into());
        fields.insert("published_at".to_string(), self.published_at.into());
        fields
    }

    fn dirty_attributes(&self) -> Fields {
        let mut fields = Fields::new();
        if self.saved_title.as_deref() != Some(self.title.as_str()) {
            fields.insert("title".to_string(), FieldValue::from(self.title.clone()));
        }
        fields
    }

    fn hydrate(&self, source: Map<String, Value>) -> Result<Self, FlexError> {
        hydrate_from_source(source)
    }
}

// In-memory search client keyed by document address
struct MemoryIndex {
    documents: Mutex<HashMap<String, Map<String, Value>>>,
    versions: Mutex<HashMap<String, i64>>,
    log: EventLog,
}

impl MemoryIndex {
    fn new(log: EventLog) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            versions: Mutex::new(HashMap::new()),
            log,
        }
    }

    fn document(&self, address: &str) -> Option<Map<String, Value>> {
        self.documents.lock().unwrap().get(address).cloned()
    }

    fn forget(&self, address: &str) {
        self.documents.lock().unwrap().remove(address);
    }

    fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    fn push(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl SearchClient for MemoryIndex {
    async fn index_document(
        &self,
        address: &DocumentAddress,
        document: &Map<String, Value>,
        version: Option<i64>,
    ) -> Result<Value, FlexError> {
        self.push(format!("index {}", address));
        // External versioning: only a greater version replaces the document
        if let Some(version) = version {
            let mut versions = self.versions.lock().unwrap();
            let stored = versions.get(&address.to_string()).copied();
            if stored.is_some_and(|stored| stored >= version) {
                return Err(FlexError::version_conflict(address));
            }
            versions.insert(address.to_string(), version);
        }
        self.documents
            .lock()
            .unwrap()
            .insert(address.to_string(), document.clone());
        Ok(json!({"result": "created"}))
    }

    async fn update_document(
        &self,
        address: &DocumentAddress,
        partial: &Map<String, Value>,
    ) -> Result<Value, FlexError> {
        self.push(format!("update {}", address));
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .get_mut(&address.to_string())
            .ok_or_else(|| FlexError::document_not_found(address))?;
        for (name, value) in partial {
            document.insert(name.clone(), value.clone());
        }
        Ok(json!({"result": "updated"}))
    }

    async fn delete_document(&self, address: &DocumentAddress) -> Result<Value, FlexError> {
        self.push(format!("delete {}", address));
        match self.documents.lock().unwrap().remove(&address.to_string()) {
            Some(_) => Ok(json!({"result": "deleted"})),
            None => Err(FlexError::document_not_found(address)),
        }
    }

    async fn bulk(&self, _operations: &[BulkOperation]) -> Result<BulkResponse, FlexError> {
        Err(FlexError::bulk("not used"))
    }

    // Every stored document of the target is a hit
    async fn search(&self, target: &IndexTarget, _body: &Value) -> Result<Value, FlexError> {
        let prefix = format!("{}/", target);
        let hits: Vec<Value> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(address, _)| address.starts_with(&prefix))
            .map(|(address, document)| {
                json!({
                    "_id": address.trim_start_matches(&prefix),
                    "_score": 1.0,
                    "_source": document,
                })
            })
            .collect();
        Ok(json!({"took": 1, "hits": {"total": {"value": hits.len()}, "hits": hits}}))
    }

    async fn count(&self, _target: &IndexTarget, _body: &Value) -> Result<u64, FlexError> {
        Ok(self.len() as u64)
    }

    async fn get_mapping(&self, _target: &IndexTarget) -> Result<Value, FlexError> {
        Ok(json!({}))
    }

    async fn put_mapping(&self, _target: &IndexTarget, _mapping: &Value) -> Result<Value, FlexError> {
        Ok(json!({"acknowledged": true}))
    }

    async fn delete_mapping(&self, _target: &IndexTarget) -> Result<Value, FlexError> {
        Ok(json!({"acknowledged": true}))
    }
}

// In-memory store assigning sequential keys
struct MemoryStore {
    next_id: Mutex<i64>,
    log: EventLog,
    fail: bool,
}

impl MemoryStore {
    fn new(log: EventLog) -> Self {
        Self {
            next_id: Mutex::new(1),
            log,
            fail: false,
        }
    }

    fn failing(log: EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl EntityStore<Article> for MemoryStore {
    async fn save(&self, entity: &mut Article) -> Result<(), FlexError> {
        if self.fail {
            return Err(FlexError::persistence("database unavailable"));
        }
        if entity.id.is_none() {
            let mut next_id = self.next_id.lock().unwrap();
            entity.id = Some(*next_id);
            *next_id += 1;
        }
        entity.saved_title = Some(entity.title.clone());
        self.log
            .lock()
            .unwrap()
            .push(format!("store.save {}", entity.id.unwrap_or_default()));
        Ok(())
    }

    async fn delete(&self, entity: &Article) -> Result<(), FlexError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("store.delete {}", entity.id.unwrap_or_default()));
        Ok(())
    }
}

fn setup(auto_index: bool) -> (FlexService, Arc<MemoryIndex>, MemoryStore, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let index = Arc::new(MemoryIndex::new(log.clone()));
    let store = MemoryStore::new(log.clone());
    let service = FlexService::new(
        index.clone(),
        FlexConfig::new("blog").with_auto_index(auto_index),
    );
    (service, index, store, log)
}

fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn test_first_save_persists_before_indexing() {
    let (service, index, store, log) = setup(true);
    let mut article = Article::draft("Ownership");

    service.save(&mut article, &store).await.unwrap();

    assert_eq!(article.id, Some(1));
    assert_eq!(
        events(&log),
        vec!["store.save 1", "index blog/articles/1"]
    );
    let document = index.document("blog/articles/1").unwrap();
    assert_eq!(document.get("title"), Some(&json!("Ownership")));
}

#[tokio::test]
async fn test_later_save_updates_dirty_attributes() {
    let (service, index, store, log) = setup(true);
    let mut article = Article::draft("Old");
    service.save(&mut article, &store).await.unwrap();
    log.lock().unwrap().clear();

    article.title = "New".to_string();
    service.save(&mut article, &store).await.unwrap();

    assert_eq!(
        events(&log),
        vec!["update blog/articles/1", "store.save 1"]
    );
    let document = index.document("blog/articles/1").unwrap();
    assert_eq!(document.get("title"), Some(&json!("New")));
}

#[tokio::test]
async fn test_later_save_falls_back_to_index_when_document_missing() {
    let (service, index, store, log) = setup(true);
    let mut article = Article::draft("Old");
    service.save(&mut article, &store).await.unwrap();
    index.forget("blog/articles/1");
    log.lock().unwrap().clear();

    article.title = "New".to_string();
    service.save(&mut article, &store).await.unwrap();

    assert_eq!(
        events(&log),
        vec![
            "update blog/articles/1",
            "index blog/articles/1",
            "store.save 1"
        ]
    );
    assert!(index.document("blog/articles/1").is_some());
}

#[tokio::test]
async fn test_clean_save_leaves_document_alone() {
    let (service, _index, store, log) = setup(true);
    let mut article = Article::draft("Same");
    service.save(&mut article, &store).await.unwrap();
    log.lock().unwrap().clear();

    // Nothing dirty, so the document is left alone
    service.save(&mut article, &store).await.unwrap();

    assert_eq!(events(&log), vec!["store.save 1"]);
}

#[tokio::test]
async fn test_delete_removes_document_before_row() {
    let (service, index, store, log) = setup(true);
    let mut article = Article::draft("Lifetimes");
    service.save(&mut article, &store).await.unwrap();
    log.lock().unwrap().clear();

    service.delete(&article, &store).await.unwrap();

    assert_eq!(
        events(&log),
        vec!["delete blog/articles/1", "store.delete 1"]
    );
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_delete_of_unindexed_entity_still_deletes_row() {
    let (service, _index, store, log) = setup(true);
    let article = Article {
        id: Some(9),
        title: "Never indexed".to_string(),
        ..Default::default()
    };

    service.delete(&article, &store).await.unwrap();

    assert_eq!(
        events(&log),
        vec!["delete blog/articles/9", "store.delete 9"]
    );
}

#[tokio::test]
async fn test_auto_index_disabled_only_persists() {
    let (service, index, store, log) = setup(false);
    let mut article = Article::draft("Traits");

    service.save(&mut article, &store).await.unwrap();
    article.title = "Generics".to_string();
    service.save(&mut article, &store).await.unwrap();
    service.delete(&article, &store).await.unwrap();

    assert_eq!(
        events(&log),
        vec!["store.save 1", "store.save 1", "store.delete 1"]
    );
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_failed_first_save_does_not_index() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let index = Arc::new(MemoryIndex::new(log.clone()));
    let store = MemoryStore::failing(log.clone());
    let service = FlexService::new(index.clone(), FlexConfig::new("blog").with_auto_index(true));
    let mut article = Article::draft("Unsaved");

    let result = service.save(&mut article, &store).await;

    assert!(matches!(result, Err(FlexError::PersistenceError(_))));
    assert!(events(&log).is_empty());
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_date_times_are_indexed_in_canonical_format() {
    let (service, index, store, _log) = setup(true);
    let mut article = Article {
        published_at: Some(
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(18, 5, 9)
                .unwrap(),
        ),
        ..Article::draft("Leap day")
    };

    service.save(&mut article, &store).await.unwrap();

    let document = index.document("blog/articles/1").unwrap();
    assert_eq!(
        document.get("published_at"),
        Some(&json!("2024-02-29 18:05:09"))
    );
}

#[tokio::test]
async fn test_indexed_date_time_hydrates_from_search() {
    let (service, _index, _store, _log) = setup(true);
    let published_at = NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let article = Article {
        id: Some(4),
        published_at: Some(published_at),
        ..Article::draft("Pinning")
    };

    service.index(&article).await.unwrap();
    let results = service
        .scope::<Article>()
        .match_query("title", "pinning")
        .await
        .unwrap();

    assert_eq!(results.total, 1);
    let hit = &results.hits[0];
    assert_eq!(hit.id, Some(4));
    assert_eq!(hit.title, "Pinning");
    assert_eq!(hit.published_at, Some(published_at));
}

#[tokio::test]
async fn test_versioned_index_accepts_only_greater_versions() {
    let (service, index, _store, _log) = setup(true);
    let mut article = Article {
        id: Some(5),
        ..Article::draft("Draft")
    };

    let created = service.index_with_version(&article, 3).await.unwrap();
    article.title = "Stale".to_string();
    let same = service.index_with_version(&article, 3).await.unwrap();
    let lower = service.index_with_version(&article, 2).await.unwrap();
    article.title = "Final".to_string();
    let greater = service.index_with_version(&article, 4).await.unwrap();

    assert!(matches!(created, WriteOutcome::Written(_)));
    assert_eq!(same, WriteOutcome::Conflict);
    assert_eq!(lower, WriteOutcome::Conflict);
    assert!(matches!(greater, WriteOutcome::Written(_)));
    let document = index.document("blog/articles/5").unwrap();
    assert_eq!(document.get("title"), Some(&json!("Final")));
}
