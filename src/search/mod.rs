pub mod client;
pub mod documents;
#[cfg(test)]
pub mod memory;
pub mod retry;

pub use client::ElasticClient;
pub use documents::{DocumentBody, DocumentRef, Tweet};
pub use retry::RetryPolicy;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a plain GET against the cluster root
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Status line, e.g. `200 OK`
    pub status: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIndexResponse {
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub shards_acknowledged: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: i64,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default)]
    pub source: Option<serde_json::Value>,
}

/// Operations the diagnostic runner needs from the search database.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Base URL the backend talks to
    fn url(&self) -> &str;

    async fn probe(&self) -> Result<ProbeResponse, SearchError>;

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    async fn create_index(&self, index: &str) -> Result<CreateIndexResponse, SearchError>;

    async fn index_document(
        &self,
        target: &DocumentRef,
        body: DocumentBody,
    ) -> Result<IndexResponse, SearchError>;

    /// Fetch a document. A missing document is `Ok` with `found == false`.
    async fn get_document(&self, target: &DocumentRef) -> Result<GetResponse, SearchError>;
}
