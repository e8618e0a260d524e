//! R4R analysis handlers
//!
//! Endpoints for the reputation-farming assessment: full per-user analysis,
//! the dashboard summary projection, and batch network analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::{NetworkAnalysis, R4rAnalysis, R4rSummary};
use crate::error::AppError;
use crate::handlers::ApiResponse;
use crate::AppState;

/// GET /api/r4r-analysis/:userkey
///
/// Full reciprocity/risk assessment. 404 when the user has no review data.
pub async fn get_r4r_analysis(
    State(state): State<AppState>,
    Path(userkey): Path<String>,
) -> Result<Json<ApiResponse<R4rAnalysis>>, AppError> {
    let analysis = state.analyzer.analyze_user(&userkey).await?;
    Ok(ApiResponse::ok(analysis))
}

/// GET /api/r4r-summary/:userkey
///
/// Lightweight projection for dashboard tiles; users without review data
/// get a neutral all-zero summary.
pub async fn get_r4r_summary(
    State(state): State<AppState>,
    Path(userkey): Path<String>,
) -> Result<Json<ApiResponse<R4rSummary>>, AppError> {
    let summary = state.analyzer.summarize_user(&userkey).await?;
    Ok(ApiResponse::ok(summary))
}

/// Request body for batch network analysis
#[derive(Debug, Deserialize)]
pub struct NetworkAnalysisRequest {
    pub userkeys: Vec<String>,
}

/// POST /api/r4r-network-analysis
///
/// Analyze a set of users and the reciprocal links between them.
pub async fn post_network_analysis(
    State(state): State<AppState>,
    Json(request): Json<NetworkAnalysisRequest>,
) -> Result<Json<ApiResponse<NetworkAnalysis>>, AppError> {
    let network = state
        .analyzer
        .clone()
        .network_analysis(request.userkeys)
        .await?;
    Ok(ApiResponse::ok(network))
}
