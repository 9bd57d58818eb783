use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::recommend::RecommenderRepo;

use super::page::FormData;

pub const RECOMMEND_PATH: &str = "/recommend";

/// Where a submission's form data is sent. Returns the raw response body;
/// interpreting it is up to the caller.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch(&self, form: &FormData) -> Result<String, FetchError>;
}

/// Posts the form, URL-encoded, to a server's `/recommend` endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(server: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(server),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(server: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), RECOMMEND_PATH)
}

#[async_trait]
impl RecommendationSource for HttpSource {
    async fn fetch(&self, form: &FormData) -> Result<String, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(form)
            .send()
            .await?;

        // Non-2xx bodies are handed on like any other.
        let status = response.status();
        debug!(url = %self.endpoint, status = status.as_u16(), "Recommendation response");

        Ok(response.text().await?)
    }
}

/// Answers from an in-process recommender, producing the same body the
/// `/recommend` endpoint would.
pub struct LocalSource {
    repo: Arc<RecommenderRepo>,
}

impl LocalSource {
    pub fn new(repo: Arc<RecommenderRepo>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecommendationSource for LocalSource {
    async fn fetch(&self, form: &FormData) -> Result<String, FetchError> {
        let recommender = self.repo.current();
        let body = recommender.respond(form.title());
        Ok(serde_json::to_string(&body)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
