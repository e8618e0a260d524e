//! Mock implementations of port traits
//!
//! In-memory implementations that can be seeded for testing. They record
//! fetch counts so tests can assert cache behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::entities::Review;
use crate::domain::ports::{EthosClient, SearchSuggestion, UserProfile};
use crate::error::EthosError;

// ============================================================================
// In-Memory Ethos Client
// ============================================================================

#[derive(Default)]
pub struct MockEthosClient {
    given: RwLock<HashMap<String, Vec<Review>>>,
    received: RwLock<HashMap<String, Vec<Review>>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    failing: AtomicBool,
    failing_profiles: AtomicBool,
    review_fetches: AtomicUsize,
}

impl MockEthosClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a review under both its author's given set and its
    /// subject's received set, the way the upstream indexes them.
    pub fn with_review(self, review: Review) -> Self {
        {
            let mut given = self.given.write().unwrap();
            let mut received = self.received.write().unwrap();
            given
                .entry(review.author.clone())
                .or_default()
                .push(review.clone());
            received
                .entry(review.subject.clone())
                .or_default()
                .push(review);
        }
        self
    }

    pub fn with_profile(
        self,
        userkey: &str,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Self {
        {
            let mut profiles = self.profiles.write().unwrap();
            profiles.insert(
                userkey.to_string(),
                UserProfile {
                    userkey: userkey.to_string(),
                    display_name: display_name.map(str::to_string),
                    username: None,
                    avatar_url: avatar_url.map(str::to_string),
                },
            );
        }
        self
    }

    /// Make every call fail until `set_failing(false)`.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Make only profile lookups fail.
    pub fn with_failing_profiles(self) -> Self {
        self.failing_profiles.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total review fetches issued (both directions).
    pub fn review_fetch_count(&self) -> usize {
        self.review_fetches.load(Ordering::SeqCst)
    }

    fn failure() -> EthosError {
        EthosError::Api {
            status: 503,
            message: "mock upstream failure".to_string(),
        }
    }
}

#[async_trait]
impl EthosClient for MockEthosClient {
    async fn fetch_reviews_given(&self, userkey: &str) -> Result<Vec<Review>, EthosError> {
        self.review_fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self
            .given
            .read()
            .unwrap()
            .get(userkey)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_reviews_received(&self, userkey: &str) -> Result<Vec<Review>, EthosError> {
        self.review_fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self
            .received
            .read()
            .unwrap()
            .get(userkey)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_profile(&self, userkey: &str) -> Result<Option<UserProfile>, EthosError> {
        if self.failing.load(Ordering::SeqCst) || self.failing_profiles.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self.profiles.read().unwrap().get(userkey).cloned())
    }

    async fn search_users(
        &self,
        _query: &str,
        _limit: usize,
        _offset: usize,
    ) -> Result<Vec<SearchSuggestion>, EthosError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(Vec::new())
    }
}
