//! Search suggestion handler
//!
//! Thin proxy over the upstream user search for the search box dropdown.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{EthosClient, SearchSuggestion};
use crate::AppState;

/// Minimum query length before the upstream is consulted
const MIN_QUERY_CHARS: usize = 3;

/// Query params for search suggestions
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    8
}

/// Search response; a failed upstream search is reported in-band so the
/// search box can treat it as "no results" without a retry storm.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<SearchSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/search-suggestions?q=&limit=&offset=
pub async fn search_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let query = params.q.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Json(SearchResponse {
            success: true,
            data: vec![],
            error: None,
        });
    }

    match state
        .ethos
        .search_users(query, params.limit, params.offset)
        .await
    {
        Ok(data) => Json(SearchResponse {
            success: true,
            data,
            error: None,
        }),
        Err(e) => {
            tracing::warn!(query, error = %e, "search suggestion fetch failed");
            Json(SearchResponse {
                success: false,
                data: vec![],
                error: Some("Failed to fetch from reputation service".to_string()),
            })
        }
    }
}
