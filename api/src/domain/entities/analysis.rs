//! Analysis domain entities
//!
//! Output aggregates of the R4R ("review-for-review") analyzer: reciprocal
//! review pairs, per-counterpart network connections, and the per-user
//! assessment served over HTTP. Serialized shapes are consumed by the
//! dashboard frontend and therefore camelCase.

use serde::{Deserialize, Serialize};

use super::review::Review;
use crate::app::analyzer_config::{
    QUICK_RECIPROCAL_WINDOW_MINUTES, RISK_CRITICAL_THRESHOLD, RISK_HIGH_THRESHOLD,
    RISK_MODERATE_THRESHOLD,
};

/// Risk classification for an r4r score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a composite score into a tier. Thresholds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= RISK_CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if score >= RISK_HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= RISK_MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// Two reviews between the same two parties, one in each direction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPair {
    /// The other party (the analyzed user is implied)
    pub counterpart: String,
    /// Review written by the analyzed user
    pub given: Review,
    /// Review written by the counterpart
    pub received: Review,
    /// Absolute minutes between the two reviews
    pub time_gap_minutes: i64,
}

impl ReviewPair {
    pub fn new(counterpart: String, given: Review, received: Review) -> Self {
        let time_gap_minutes = (given.created_at - received.created_at).num_minutes().abs();
        Self {
            counterpart,
            given,
            received,
            time_gap_minutes,
        }
    }

    /// A pair reciprocated within the quick window is the strongest
    /// farming signal the analyzer has.
    pub fn is_quick(&self) -> bool {
        self.time_gap_minutes <= QUICK_RECIPROCAL_WINDOW_MINUTES
    }
}

/// One counterpart the subject has reciprocal review activity with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConnection {
    pub userkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub reciprocal_count: usize,
    pub quick_reciprocal_count: usize,
    /// 0-100, derived from reciprocity frequency and timing
    pub suspicious_score: f64,
}

/// A counterpart whose own aggregate behavior independently scores high
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighR4rReviewer {
    pub userkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub r4r_score: f64,
    pub risk_level: RiskLevel,
}

/// Full reciprocity/risk assessment for one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct R4rAnalysis {
    pub userkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub total_reviews_given: usize,
    pub total_reviews_received: usize,
    pub reciprocal_reviews: usize,
    pub quick_reciprocal_count: usize,
    /// reciprocal pairs over the larger review direction, 0-100
    pub reciprocal_percentage: f64,
    /// Share of received reviews with positive sentiment, 0-100
    pub positive_percentage: f64,
    pub r4r_score: f64,
    pub risk_level: RiskLevel,
    pub network_connections: Vec<NetworkConnection>,
    #[serde(rename = "highR4RReviewers")]
    pub high_r4r_reviewers: Vec<HighR4rReviewer>,
}

/// Lightweight dashboard projection of an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct R4rSummary {
    pub total_reviews: usize,
    pub positive_percentage: f64,
    pub reciprocal_reviews: usize,
    pub quick_reciprocal_count: usize,
    pub r4r_score: f64,
    pub risk_level: RiskLevel,
}

impl R4rSummary {
    /// Neutral summary served when the subject has no review data.
    pub fn empty() -> Self {
        Self {
            total_reviews: 0,
            positive_percentage: 0.0,
            reciprocal_reviews: 0,
            quick_reciprocal_count: 0,
            r4r_score: 0.0,
            risk_level: RiskLevel::Low,
        }
    }
}

impl From<&R4rAnalysis> for R4rSummary {
    fn from(analysis: &R4rAnalysis) -> Self {
        Self {
            total_reviews: analysis.total_reviews_received,
            positive_percentage: analysis.positive_percentage,
            reciprocal_reviews: analysis.reciprocal_reviews,
            quick_reciprocal_count: analysis.quick_reciprocal_count,
            r4r_score: analysis.r4r_score,
            risk_level: analysis.risk_level,
        }
    }
}

/// Sentiment-only summary for the fast dashboard tile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total_reviews: usize,
    pub positive_percentage: f64,
}

impl ReviewSummary {
    pub fn empty() -> Self {
        Self {
            total_reviews: 0,
            positive_percentage: 0.0,
        }
    }
}

/// Reciprocal activity discovered between two analyzed users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossConnection {
    pub user1: String,
    pub user2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection1to2: Option<NetworkConnection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection2to1: Option<NetworkConnection>,
    pub is_mutual: bool,
    pub suspicious_score: f64,
}

/// Batch analysis of a set of users plus the links between them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysis {
    pub analyses: Vec<R4rAnalysis>,
    pub cross_connections: Vec<CrossConnection>,
    /// Mean suspicious score over discovered cross-connections, 0 when none
    pub network_suspicious_score: f64,
}
