use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Something that can propose extra phrases for a query.
pub trait CandidateSource {
    /// Up to `count` phrases for `query`, in the order the source ranks them.
    fn fetch_candidates(
        &self,
        query: &str,
        count: usize,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// A health check against a dependency.
pub trait HealthProbe {
    /// `true` only when the dependency answered with success.
    fn probe(&self) -> impl Future<Output = bool> + Send;
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    items: Vec<String>,
}

/// HTTP client for the sibling inference service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn prompts_url(&self, query: &str, count: usize) -> Result<Url> {
        let mut url = self.base_url.join("q")?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("n", &count.to_string());
        Ok(url)
    }

    /// Single `GET /ping`. Any transport error is reported, not swallowed.
    pub async fn ping(&self) -> Result<reqwest::StatusCode> {
        let url = self.base_url.join("ping")?;
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }
}

impl CandidateSource for RemoteClient {
    /// One `GET /q?query=..&n=..` attempt, no retries.
    async fn fetch_candidates(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let url = self.prompts_url(query, count)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body = response.bytes().await?;
        let parsed: PromptResponse = serde_json::from_slice(&body)?;
        Ok(parsed.items)
    }
}

impl HealthProbe for RemoteClient {
    async fn probe(&self) -> bool {
        match self.ping().await {
            Ok(status) => {
                tracing::debug!(%status, "Readiness probe answered");
                status == reqwest::StatusCode::OK
            }
            Err(e) => {
                tracing::debug!(error = %e, "Readiness probe failed");
                false
            }
        }
    }
}
