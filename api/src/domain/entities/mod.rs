//! Domain entities
//!
//! Pure domain models representing core business concepts.

pub mod analysis;
pub mod review;

pub use analysis::{
    CrossConnection, HighR4rReviewer, NetworkAnalysis, NetworkConnection, R4rAnalysis, R4rSummary,
    ReviewPair, ReviewSummary, RiskLevel,
};
pub use review::{Review, Sentiment};
