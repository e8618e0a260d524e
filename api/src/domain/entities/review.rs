//! Review domain entity
//!
//! A review is an assertion from one protocol participant about another,
//! fetched from the upstream API and never created or mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment of a review, derived from its numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Positive if the score is above zero, negative below, else neutral.
    pub fn from_score(score: i64) -> Self {
        if score > 0 {
            Sentiment::Positive
        } else if score < 0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "1" | "true" => Ok(Sentiment::Positive),
            "negative" | "-1" | "false" => Ok(Sentiment::Negative),
            "neutral" | "0" => Ok(Sentiment::Neutral),
            _ => Err(format!("Unknown sentiment: {}", s)),
        }
    }
}

/// A review between two protocol participants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    /// Userkey of the participant who wrote the review
    pub author: String,
    /// Userkey of the participant the review is about
    pub subject: String,
    pub sentiment: Sentiment,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// The userkey on the other side of this review from `userkey`.
    ///
    /// Returns `None` when `userkey` is not a party to the review.
    pub fn counterpart_of(&self, userkey: &str) -> Option<&str> {
        if self.author == userkey {
            Some(&self.subject)
        } else if self.subject == userkey {
            Some(&self.author)
        } else {
            None
        }
    }

    pub fn is_positive(&self) -> bool {
        self.sentiment == Sentiment::Positive
    }
}
