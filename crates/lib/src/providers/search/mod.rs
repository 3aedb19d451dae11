pub mod tavily;

use crate::errors::SearchError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub use tavily::TavilyProvider;

/// One ranked result of a web search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Full page text, when the search service already extracted it.
    pub raw_content: Option<String>,
}

/// A trait for the external web search capability.
#[async_trait]
pub trait SearchProvider: Send + Sync + Debug + DynClone {
    /// Returns results for `query`, best first.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, SearchError>;
}

dyn_clone::clone_trait_object!(SearchProvider);
