//! Review summary handler
//!
//! Fast sentiment-only summary for the dashboard, bypassing the full
//! pairing analysis.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::entities::ReviewSummary;
use crate::error::AppError;
use crate::handlers::ApiResponse;
use crate::AppState;

/// GET /api/review-summary/:userkey
///
/// The dashboard tile tolerates missing data, so an upstream failure
/// degrades to a zero summary instead of a 5xx.
pub async fn get_review_summary(
    State(state): State<AppState>,
    Path(userkey): Path<String>,
) -> Result<Json<ApiResponse<ReviewSummary>>, AppError> {
    match state.analyzer.review_summary(&userkey).await {
        Ok(summary) => Ok(ApiResponse::ok(summary)),
        Err(AppError::Ethos(e)) => {
            tracing::warn!(%userkey, error = %e, "review summary fetch failed, serving zeros");
            Ok(ApiResponse::ok(ReviewSummary::empty()))
        }
        Err(e) => Err(e),
    }
}
