use super::{
    CreateIndexResponse, DocumentBody, DocumentRef, GetResponse, IndexResponse, ProbeResponse,
    SearchBackend, SearchError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct StoredDocument {
    version: i64,
    source: serde_json::Value,
}

/// In-process stand-in for a search cluster
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    indices: Mutex<HashMap<String, HashMap<(String, String), StoredDocument>>>,
    create_calls: AtomicUsize,
    /// Operations that fail with a 500, keyed by name (`exists`, `create`, `index`, `get`)
    failing: Vec<&'static str>,
    unacknowledged: bool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(ops: &[&'static str]) -> Self {
        Self {
            failing: ops.to_vec(),
            ..Self::default()
        }
    }

    /// Index creation succeeds but reports `acknowledged: false`
    pub fn unacknowledged() -> Self {
        Self {
            unacknowledged: true,
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map_or(0, HashMap::len)
    }

    fn check(&self, op: &str) -> Result<(), SearchError> {
        if self.failing.contains(&op) {
            return Err(SearchError::Status {
                status: 500,
                body: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    fn url(&self) -> &str {
        "http://memory:9200"
    }

    async fn probe(&self) -> Result<ProbeResponse, SearchError> {
        Ok(ProbeResponse {
            status: "200 OK".to_string(),
            body: r#"{"name":"memory"}"#.to_string(),
        })
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.check("exists")?;
        Ok(self.indices.lock().unwrap().contains_key(index))
    }

    async fn create_index(&self, index: &str) -> Result<CreateIndexResponse, SearchError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check("create")?;

        let mut indices = self.indices.lock().unwrap();
        if indices.contains_key(index) {
            return Err(SearchError::Status {
                status: 400,
                body: "resource_already_exists_exception".to_string(),
            });
        }
        indices.insert(index.to_string(), HashMap::new());
        Ok(CreateIndexResponse {
            acknowledged: !self.unacknowledged,
            shards_acknowledged: !self.unacknowledged,
        })
    }

    async fn index_document(
        &self,
        target: &DocumentRef,
        body: DocumentBody,
    ) -> Result<IndexResponse, SearchError> {
        self.check("index")?;
        let bytes = body.into_bytes()?;
        let source: serde_json::Value = serde_json::from_slice(&bytes)?;

        let mut indices = self.indices.lock().unwrap();
        let docs = indices.entry(target.index.clone()).or_default();
        let doc = docs
            .entry((target.doc_type.clone(), target.id.clone()))
            .or_default();
        doc.version += 1;
        doc.source = source;

        Ok(IndexResponse {
            index: target.index.clone(),
            doc_type: target.doc_type.clone(),
            id: target.id.clone(),
            version: doc.version,
            result: Some(if doc.version == 1 { "created" } else { "updated" }.to_string()),
        })
    }

    async fn get_document(&self, target: &DocumentRef) -> Result<GetResponse, SearchError> {
        self.check("get")?;
        let indices = self.indices.lock().unwrap();
        let docs = indices.get(&target.index).ok_or_else(|| SearchError::Status {
            status: 404,
            body: "index_not_found_exception".to_string(),
        })?;
        let doc = docs.get(&(target.doc_type.clone(), target.id.clone()));

        Ok(GetResponse {
            index: target.index.clone(),
            doc_type: target.doc_type.clone(),
            id: target.id.clone(),
            version: doc.map(|d| d.version),
            found: doc.is_some(),
            source: doc.map(|d| d.source.clone()),
        })
    }
}
