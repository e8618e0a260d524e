//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod analysis;
pub mod reviews;
pub mod search;

use axum::Json;
use serde::Serialize;

pub use analysis::{get_r4r_analysis, get_r4r_summary, post_network_analysis};
pub use reviews::get_review_summary;
pub use search::search_suggestions;

/// Success envelope shared by the JSON endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}
