//! Network collaborator that answers suggestion queries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use url::Url;

use crate::error::{SuggestError, SuggestResult};
use crate::model::{CategorizedResults, SuggestionsPayload};

/// Anything that can turn a query into a categorized result set.
///
/// Implementations must stop work when the returned future is dropped; the
/// request coordinator drops it as its cancellation signal.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self, query: &str) -> SuggestResult<CategorizedResults>;
}

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub endpoint: Url,
    pub query_param: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    http_client: HttpClient,
    endpoint: Url,
    query_param: String,
}

impl HttpSuggestionSource {
    pub fn new(config: HttpSourceConfig) -> SuggestResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("typeahead/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(http_client, config))
    }

    /// The client's own timeout applies; `config.timeout` is ignored.
    pub fn with_client(http_client: HttpClient, config: HttpSourceConfig) -> Self {
        Self {
            http_client,
            endpoint: config.endpoint,
            query_param: config.query_param,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.query_param, query);
        url
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionSource {
    async fn fetch(&self, query: &str) -> SuggestResult<CategorizedResults> {
        let url = self.request_url(query);
        tracing::debug!(%url, "fetching suggestions");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status { status });
        }

        let text = response.text().await?;
        parse_payload(&text)
    }
}

/// Decodes the endpoint body, treating absent buckets as empty.
pub fn parse_payload(text: &str) -> SuggestResult<CategorizedResults> {
    let payload: SuggestionsPayload = serde_json::from_str(text)?;
    Ok(payload.suggestions)
}
