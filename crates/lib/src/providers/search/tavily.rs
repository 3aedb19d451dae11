use crate::{
    errors::SearchError,
    providers::search::{SearchHit, SearchProvider},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com/search";

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    include_raw_content: bool,
    max_results: usize,
}

#[derive(Deserialize, Debug)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize, Debug)]
struct TavilyResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    raw_content: Option<String>,
}

/// A search provider backed by the Tavily search API.
#[derive(Clone, Debug)]
pub struct TavilyProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl TavilyProvider {
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;

        let payload = TavilyRequest {
            api_key,
            query,
            search_depth: "advanced",
            include_raw_content: true,
            max_results,
        };

        let response = self.client.post(&self.api_url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, body });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Deserialization(e.to_string()))?;

        let hits: Vec<SearchHit> = parsed
            .results
            .into_iter()
            .filter_map(|item| {
                let url = item.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
                let title = item
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| url.clone());
                let snippet = item
                    .snippet
                    .or(item.content)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| title.clone());
                Some(SearchHit {
                    url,
                    title,
                    snippet,
                    raw_content: item.raw_content.filter(|c| !c.trim().is_empty()),
                })
            })
            .collect();

        debug!(query, hits = hits.len(), "Tavily search completed");
        Ok(hits)
    }
}
