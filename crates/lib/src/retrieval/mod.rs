//! # Retrieval Engine
//!
//! Turns a company/role target into a short, ranked list of cleaned candidate
//! sources. Every step is failure-isolated: a failing search query, fetch or
//! extraction drops that one item and the batch carries on.

pub mod normalize;
pub mod text;

use crate::{
    errors::{CoachError, FetchError, SearchError},
    providers::{
        fetch::PageFetcher,
        search::{SearchHit, SearchProvider},
    },
    types::Source,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, time::Duration};
use tracing::{debug, info, instrument, warn};

pub use normalize::normalize_url;
pub use text::{clean_text, truncate_chars};

/// Bounds applied to a retrieval run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of sources kept in the conversation state.
    pub max_sources: usize,
    /// Maximum number of unique URLs fetched per run.
    pub max_candidates: usize,
    /// Results requested from the search capability per query.
    pub results_per_query: usize,
    /// Number of fetches in flight at once.
    pub fetch_concurrency: usize,
    pub fetch_timeout_secs: u64,
    /// Stored text per source, in characters.
    pub max_source_chars: usize,
    /// Sources with less cleaned text than this are dropped.
    pub min_content_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_sources: 5,
            max_candidates: 10,
            results_per_query: 5,
            fetch_concurrency: 4,
            fetch_timeout_secs: 15,
            max_source_chars: 10_000,
            min_content_chars: 300,
        }
    }
}

/// Builds the search queries for a target. At least one of the two must be set.
pub fn search_queries(company: Option<&str>, role: Option<&str>) -> Vec<String> {
    let subject = [company, role]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let focus = company.or(role).unwrap_or_default();
    vec![
        format!("{subject} interview experience"),
        format!("{subject} interview process"),
        format!("glassdoor {focus} interview questions"),
        format!("reddit {focus} interview questions"),
        format!("interview tips for {focus}"),
    ]
}

/// Searches, deduplicates, fetches and cleans candidate sources.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    search: Box<dyn SearchProvider>,
    fetcher: Box<dyn PageFetcher>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        search: Box<dyn SearchProvider>,
        fetcher: Box<dyn PageFetcher>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            search,
            fetcher,
            config,
        }
    }

    /// Retrieves sources for a target, extending `prior`.
    ///
    /// The result starts with `prior` and never holds two sources with the same
    /// normalised URL or more than `max_sources` entries. Fails only when both
    /// company and role are missing.
    #[instrument(skip(self, prior), fields(prior = prior.len()))]
    pub async fn retrieve(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        prior: &[Source],
    ) -> Result<Vec<Source>, CoachError> {
        if company.is_none() && role.is_none() {
            return Err(CoachError::InsufficientContext);
        }

        let mut sources: Vec<Source> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for source in prior {
            if sources.len() < self.config.max_sources && seen.insert(normalize_url(&source.url)) {
                sources.push(source.clone());
            }
        }
        let room = self.config.max_sources - sources.len();
        if room == 0 {
            debug!("Source cap already reached, skipping retrieval");
            return Ok(sources);
        }

        let candidates = self.collect_candidates(company, role, &mut seen).await;
        info!(candidates = candidates.len(), "Collected candidate URLs");

        let fetched: Vec<Option<Source>> = stream::iter(candidates)
            .map(|hit| self.build_source(hit))
            .buffered(self.config.fetch_concurrency.max(1))
            .collect()
            .await;

        let new_sources: Vec<Source> = fetched.into_iter().flatten().take(room).collect();
        info!(added = new_sources.len(), "Retrieval finished");
        sources.extend(new_sources);
        Ok(sources)
    }

    /// Runs every query and keeps the first `max_candidates` unseen URLs, in
    /// rank order.
    async fn collect_candidates(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        seen: &mut HashSet<String>,
    ) -> Vec<SearchHit> {
        let mut candidates = Vec::new();

        for query in search_queries(company, role) {
            if candidates.len() >= self.config.max_candidates {
                break;
            }
            let hits = match self
                .search
                .search(&query, self.config.results_per_query)
                .await
            {
                Ok(hits) => hits,
                Err(SearchError::MissingApiKey) => {
                    let e = CoachError::BackendUnavailable(SearchError::MissingApiKey.to_string());
                    warn!("Retrieval yields no sources: {e}");
                    break;
                }
                Err(e) => {
                    warn!(query = %query, "Search query failed: {e}");
                    continue;
                }
            };

            for hit in hits {
                if candidates.len() >= self.config.max_candidates {
                    break;
                }
                if seen.insert(normalize_url(&hit.url)) {
                    candidates.push(hit);
                } else {
                    debug!(url = %hit.url, "Skipping duplicate URL");
                }
            }
        }
        candidates
    }

    fn usable_text(&self, raw: &str) -> Option<String> {
        let cleaned = clean_text(raw, self.config.max_source_chars);
        (cleaned.chars().count() >= self.config.min_content_chars).then_some(cleaned)
    }

    /// Fetches one candidate. Falls back to the search result's own content,
    /// then its snippet, when the page is unusable.
    async fn build_source(&self, hit: SearchHit) -> Option<Source> {
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        let fetched = match tokio::time::timeout(timeout, self.fetcher.fetch(&hit.url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        let (page_title, page_text) = match fetched {
            Ok(page) => {
                let text = self.usable_text(&page.text);
                if text.is_none() {
                    debug!(url = %hit.url, kind = ?page.kind, "Fetched page has too little text");
                }
                (page.title, text)
            }
            Err(reason) => {
                warn!(
                    "{}",
                    CoachError::SourceFetchFailed {
                        url: hit.url.clone(),
                        reason
                    }
                );
                (None, None)
            }
        };

        let Some(text) = page_text
            .or_else(|| hit.raw_content.as_deref().and_then(|raw| self.usable_text(raw)))
            .or_else(|| self.usable_text(&hit.snippet))
        else {
            let reason = FetchError::TooShort(hit.snippet.chars().count());
            warn!("{}", CoachError::SourceFetchFailed { url: hit.url, reason });
            return None;
        };

        let title = page_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| Some(hit.title.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| hit.url.clone());

        Some(Source {
            url: hit.url,
            title,
            text,
            snippet: hit.snippet,
            retrieved_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_queries_with_both() {
        let queries = search_queries(Some("Acme"), Some("Data Analyst"));
        assert_eq!(queries[0], "Acme Data Analyst interview experience");
        assert_eq!(queries[2], "glassdoor Acme interview questions");
        assert_eq!(queries.len(), 5);
    }

    #[test]
    fn test_search_queries_role_only() {
        let queries = search_queries(None, Some("Data Analyst"));
        assert_eq!(queries[1], "Data Analyst interview process");
        assert_eq!(queries[4], "interview tips for Data Analyst");
    }
}
