//! Ethos API client implementation

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::app::analyzer_config::{MAX_REVIEW_PAGES, REVIEW_PAGE_SIZE};
use crate::domain::entities::{Review, Sentiment};
use crate::domain::ports::{EthosClient, SearchSuggestion, UserProfile};
use crate::error::EthosError;

/// Implementation of the Ethos API client
pub struct EthosClientImpl {
    http: Client,
    base_url: String,
    client_header: String,
}

impl EthosClientImpl {
    pub fn new(base_url: String, client_header: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_header,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, EthosError> {
        self.http
            .get(url)
            .header("Accept", "application/json")
            .header("X-Ethos-Client", &self.client_header)
            .send()
            .await
            .map_err(map_transport_error)
    }

    async fn send_post<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, EthosError> {
        self.http
            .post(url)
            .header("Accept", "application/json")
            .header("X-Ethos-Client", &self.client_header)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, EthosError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| EthosError::Deserialization(e.to_string()))
        } else if status.as_u16() == 429 {
            Err(EthosError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(EthosError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Fetch one direction of a user's reviews, following pagination up to
    /// a fixed page bound.
    async fn fetch_reviews_side(
        &self,
        side: &str,
        userkey: &str,
    ) -> Result<Vec<Review>, EthosError> {
        let mut reviews = Vec::new();
        let mut skipped = 0usize;

        for page in 0..MAX_REVIEW_PAGES {
            let url = self.api_url(&format!(
                "/api/v1/reviews?{}={}&limit={}&offset={}",
                side,
                encode(userkey),
                REVIEW_PAGE_SIZE,
                page * REVIEW_PAGE_SIZE,
            ));
            let envelope: V1Envelope<V1Page<RawReview>> =
                self.handle_response(self.send_get(&url).await?).await?;
            if !envelope.ok {
                return Err(EthosError::Api {
                    status: 200,
                    message: "upstream returned ok=false".to_string(),
                });
            }

            let batch = envelope.data.values;
            let batch_len = batch.len();
            for raw in batch {
                match raw.into_review() {
                    Some(review) => reviews.push(review),
                    None => skipped += 1,
                }
            }

            if batch_len < REVIEW_PAGE_SIZE {
                break;
            }
            if page == MAX_REVIEW_PAGES - 1 {
                tracing::debug!(userkey, side, "review fetch truncated at page bound");
            }
        }

        if skipped > 0 {
            tracing::debug!(userkey, side, skipped, "skipped malformed review records");
        }
        Ok(reviews)
    }
}

fn map_transport_error(e: reqwest::Error) -> EthosError {
    if e.is_timeout() {
        EthosError::Timeout
    } else {
        EthosError::Request(e)
    }
}

/// V1 API response envelope
#[derive(Deserialize)]
struct V1Envelope<T> {
    ok: bool,
    data: T,
}

#[derive(Deserialize)]
struct V1Page<T> {
    #[serde(default)]
    values: Vec<T>,
}

/// Review record as the upstream returns it; every field is optional so a
/// partially broken record never fails the whole page.
#[derive(Debug, Default, Deserialize)]
struct RawReview {
    id: Option<i64>,
    author: Option<String>,
    subject: Option<String>,
    /// Numeric score, or a sentiment word on some older records
    score: Option<serde_json::Value>,
    comment: Option<String>,
    /// Epoch seconds or ISO-8601
    #[serde(alias = "createdAt")]
    timestamp: Option<serde_json::Value>,
}

impl RawReview {
    /// Convert to the domain type. Records missing author, subject, or a
    /// parseable timestamp are malformed and yield `None`.
    fn into_review(self) -> Option<Review> {
        let author = self.author?;
        let subject = self.subject?;
        let created_at = self.timestamp.as_ref().and_then(parse_timestamp)?;
        let score = self.score.as_ref().map(parse_score).unwrap_or(0);

        Some(Review {
            id: self.id.unwrap_or_default(),
            author,
            subject,
            sentiment: Sentiment::from_score(score),
            score,
            comment: self.comment,
            created_at,
        })
    }
}

fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

fn parse_score(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        serde_json::Value::String(s) => match s.parse::<Sentiment>() {
            Ok(Sentiment::Positive) => 1,
            Ok(Sentiment::Negative) => -1,
            _ => 0,
        },
        _ => 0,
    }
}

/// Request body for the v2 user lookup
#[derive(Serialize)]
struct UsersByUserkeysRequest<'a> {
    userkeys: Vec<&'a str>,
}

#[derive(Deserialize)]
struct RawUsersResponse {
    #[serde(default)]
    users: Vec<RawUser>,
}

#[derive(Deserialize)]
struct RawUser {
    userkey: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    username: Option<String>,
    #[serde(rename = "avatarUrl", alias = "avatar")]
    avatar_url: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawSearchUser {
    userkey: Option<String>,
    name: Option<String>,
    username: Option<String>,
    avatar: Option<String>,
    score: Option<i64>,
    description: Option<String>,
}

impl From<RawSearchUser> for SearchSuggestion {
    fn from(r: RawSearchUser) -> Self {
        let username = r.username.unwrap_or_else(|| "unknown".to_string());
        SearchSuggestion {
            userkey: r.userkey.unwrap_or_default(),
            display_name: r
                .name
                .unwrap_or_else(|| username.clone()),
            username,
            avatar_url: r.avatar.unwrap_or_default(),
            score: r.score.unwrap_or(0),
            description: r.description.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl EthosClient for EthosClientImpl {
    async fn fetch_reviews_given(&self, userkey: &str) -> Result<Vec<Review>, EthosError> {
        self.fetch_reviews_side("author", userkey).await
    }

    async fn fetch_reviews_received(&self, userkey: &str) -> Result<Vec<Review>, EthosError> {
        self.fetch_reviews_side("subject", userkey).await
    }

    async fn fetch_profile(&self, userkey: &str) -> Result<Option<UserProfile>, EthosError> {
        let url = self.api_url("/api/v2/users/by/userkeys");
        let body = UsersByUserkeysRequest {
            userkeys: vec![userkey],
        };
        let response = self.send_post(&url, &body).await?;

        match self.handle_response::<RawUsersResponse>(response).await {
            Ok(parsed) => Ok(parsed.users.into_iter().next().map(|u| UserProfile {
                userkey: u.userkey.unwrap_or_else(|| userkey.to_string()),
                display_name: u.display_name,
                username: u.username,
                avatar_url: u.avatar_url,
            })),
            Err(EthosError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn search_users(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchSuggestion>, EthosError> {
        let url = self.api_url(&format!(
            "/api/v1/search?query={}&limit={}&offset={}",
            encode(query),
            limit,
            offset
        ));
        let envelope: V1Envelope<V1Page<RawSearchUser>> =
            self.handle_response(self.send_get(&url).await?).await?;
        if !envelope.ok {
            return Ok(Vec::new());
        }
        Ok(envelope.data.values.into_iter().map(Into::into).collect())
    }
}
