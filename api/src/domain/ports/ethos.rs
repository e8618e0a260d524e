//! Ethos client port trait
//!
//! Defines the interface for interacting with the Ethos network API. The
//! analyzer only ever talks to this trait; the reqwest implementation lives
//! in the adapters layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Review;
use crate::error::EthosError;

/// Profile data used for display enrichment only, never for scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub userkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// One entry in the search-suggestion dropdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestion {
    pub userkey: String,
    pub display_name: String,
    pub username: String,
    pub avatar_url: String,
    pub score: i64,
    pub description: String,
}

/// Client for the Ethos network REST API.
///
/// The two review fetches are separate methods because the upstream exposes
/// the directions as separate queries; callers may issue them concurrently.
/// A failed fetch returns an error, never an empty list, so "no data" stays
/// distinguishable from "fetch failed".
#[async_trait]
pub trait EthosClient: Send + Sync {
    /// All reviews written by `userkey`.
    async fn fetch_reviews_given(&self, userkey: &str) -> Result<Vec<Review>, EthosError>;

    /// All reviews about `userkey`.
    async fn fetch_reviews_received(&self, userkey: &str) -> Result<Vec<Review>, EthosError>;

    /// Best-effort profile lookup; `None` when the user has no profile.
    async fn fetch_profile(&self, userkey: &str) -> Result<Option<UserProfile>, EthosError>;

    /// Free-text user search.
    async fn search_users(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchSuggestion>, EthosError>;
}
