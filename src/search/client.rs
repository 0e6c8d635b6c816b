use super::{
    CreateIndexResponse, DocumentBody, DocumentRef, GetResponse, IndexResponse, ProbeResponse,
    RetryPolicy, SearchBackend, SearchError,
};
use crate::binding::ServiceCredentials;
use crate::config::SearchConfig;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// REST client for an Elasticsearch-compatible cluster.
///
/// Talks to the single configured node only; peers are never discovered.
/// Connection and timeout failures are retried according to the
/// [`RetryPolicy`], every other failure is returned as is.
#[derive(Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    /// `http://<host>` as resolved from the binding
    url: String,
    base: Url,
    username: String,
    password: String,
    retry: RetryPolicy,
}

impl ElasticClient {
    pub fn new(
        credentials: &ServiceCredentials,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let url = credentials.url();
        let base = Url::parse(&url).map_err(|e| SearchError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl {
                url,
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url,
            base,
            username: credentials.username().to_string(),
            password: credentials.password().to_string(),
            retry: RetryPolicy::with_max_retries(config.max_retries),
        })
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn send<F>(&self, build: F) -> Result<Response, SearchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let response = self
            .retry
            .run(
                || build().send(),
                |err: &reqwest::Error| err.is_connect() || err.is_timeout(),
            )
            .await?;

        debug!(status = %response.status(), url = %response.url(), "Search request completed");
        Ok(response)
    }
}

impl fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticClient")
            .field("base", &self.base.as_str())
            .field("username", &self.username)
            .field("password", &"***")
            .field("retry", &self.retry)
            .finish()
    }
}

async fn error_for_status(response: Response) -> SearchError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SearchError::Status { status, body }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, SearchError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl SearchBackend for ElasticClient {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe(&self) -> Result<ProbeResponse, SearchError> {
        let response = self
            .send(|| self.request(Method::GET, self.base.clone()))
            .await?;

        let status = response.status().to_string();
        let body = response.text().await?;
        Ok(ProbeResponse { status, body })
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let url = self.endpoint(&[index]);
        let response = self.send(|| self.request(Method::HEAD, url.clone())).await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(error_for_status(response).await),
        }
    }

    async fn create_index(&self, index: &str) -> Result<CreateIndexResponse, SearchError> {
        let url = self.endpoint(&[index]);
        let response = self.send(|| self.request(Method::PUT, url.clone())).await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }
        decode(response).await
    }

    async fn index_document(
        &self,
        target: &DocumentRef,
        body: DocumentBody,
    ) -> Result<IndexResponse, SearchError> {
        let url = self.endpoint(&target.segments());
        let bytes = body.into_bytes()?;
        let response = self
            .send(|| {
                self.request(Method::PUT, url.clone())
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone())
            })
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }
        decode(response).await
    }

    async fn get_document(&self, target: &DocumentRef) -> Result<GetResponse, SearchError> {
        let url = self.endpoint(&target.segments());
        let response = self.send(|| self.request(Method::GET, url.clone())).await?;

        let status = response.status();
        if status.is_success() {
            return decode(response).await;
        }

        // A missing document is a 404 carrying `found: false`; a missing index is not.
        let body = response.text().await?;
        if status == StatusCode::NOT_FOUND {
            if let Ok(missing) = serde_json::from_str::<GetResponse>(&body) {
                return Ok(missing);
            }
        }
        Err(SearchError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
