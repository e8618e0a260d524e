//! Test fixtures
//!
//! Factory functions for creating test data. Timestamps are explicit
//! offsets from a fixed base so gap arithmetic is deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::{Review, Sentiment};

/// Fixed reference instant for review timestamps
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A review stamped `minutes_after` the base instant
pub fn review_at(id: i64, author: &str, subject: &str, score: i64, minutes_after: i64) -> Review {
    Review {
        id,
        author: author.to_string(),
        subject: subject.to_string(),
        sentiment: Sentiment::from_score(score),
        score,
        comment: None,
        created_at: base_time() + Duration::minutes(minutes_after),
    }
}
